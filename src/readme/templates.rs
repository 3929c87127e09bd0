//! Fixed prose surrounding each generated table.

/// Heading with its introduction, followed by the usage notes.
#[derive(Debug, Clone, Copy)]
pub struct SectionText {
    pub heading: &'static str,
    pub usage: &'static str,
}

impl SectionText {
    /// The heading promoted from `##` to `#` for a standalone file.
    pub fn standalone_heading(&self) -> String {
        match self.heading.strip_prefix("## ") {
            Some(rest) => format!("# {rest}"),
            None => self.heading.to_string(),
        }
    }
}

pub const FEATURED_PLUGINS_START: &str = "## 🌟 Featured Plugins";
pub const FEATURED_PLUGINS_END: &str = "## MCP Server";

pub const FEATURED_PLUGINS: &str = "## 🌟 Featured Plugins

Discover our curated plugins of prompts, agents, and skills organized around specific themes and workflows.";

pub const INSTRUCTIONS: SectionText = SectionText {
    heading: "## 📋 Custom Instructions

Team and project-specific instructions to enhance GitHub Copilot's behavior for specific technologies and coding practices.",
    usage: "### How to Use Custom Instructions

**To Install:**
- Click the **VS Code** or **VS Code Insiders** install button for the instruction you want to use
- Download the `*.instructions.md` file and manually add it to your project's instruction collection

**To Use/Apply:**
- Copy these instructions to your `.github/copilot-instructions.md` file in your workspace
- Create task-specific `*.instructions.md` files in your workspace's `.github/instructions/` folder (e.g., `.github/instructions/my-csharp-rules.instructions.md`)
- Instructions automatically apply to Copilot behavior once installed in your workspace",
};

pub const PROMPTS: SectionText = SectionText {
    heading: "## 🎯 Reusable Prompts

Ready-to-use prompt templates for specific development scenarios and tasks, defining prompt text with a specific mode, model, and available set of tools.",
    usage: "### How to Use Reusable Prompts

**To Install:**
- Click the **VS Code** or **VS Code Insiders** install button for the prompt you want to use
- Download the `*.prompt.md` file and manually add it to your prompt collection

**To Run/Execute:**
- Use `/prompt-name` in VS Code chat after installation
- Run the `Chat: Run Prompt` command from the Command Palette
- Hit the run button while you have a prompt file open in VS Code",
};

pub const AGENTS: SectionText = SectionText {
    heading: "## 🤖 Custom Agents

Custom agents for GitHub Copilot, making it easy for users and organizations to \"specialize\" their Copilot coding agent (CCA) through simple file-based configuration.",
    usage: "### How to Use Custom Agents

**To Install:**
- Click the **VS Code** or **VS Code Insiders** install button for the agent you want to use
- Download the `*.agent.md` file and add it to your repository

**MCP Server Setup:**
- Each agent may require one or more MCP servers to function
- Click the MCP server to view it on the GitHub MCP registry
- Follow the guide on how to add the MCP server to your repository

**To Activate/Use:**
- Access installed agents through the VS Code Chat interface, assign them in CCA, or through Copilot CLI (coming soon)
- Agents will have access to tools from configured MCP servers
- Follow agent-specific instructions for optimal usage",
};

pub const SKILLS: SectionText = SectionText {
    heading: "## 🎯 Agent Skills

Agent Skills are self-contained folders with instructions and bundled resources that enhance AI capabilities for specialized tasks. Based on the [Agent Skills specification](https://agentskills.io/specification), each skill contains a `SKILL.md` file with detailed instructions that agents load on-demand.

Skills differ from other primitives by supporting bundled assets (scripts, code samples, reference data) that agents can utilize when performing specialized tasks.",
    usage: "### How to Use Agent Skills

**What's Included:**
- Each skill is a folder containing a `SKILL.md` instruction file
- Skills may include helper scripts, code templates, or reference data
- Skills follow the Agent Skills specification for maximum compatibility

**Usage:**
- Browse the skills table below to find relevant capabilities
- Copy the skill folder to your local skills directory
- Reference skills in your prompts or let the agent discover them automatically",
};

pub const HOOKS: SectionText = SectionText {
    heading: "## 🪝 Hooks

Hooks enable automated workflows triggered by specific events during GitHub Copilot coding agent sessions, such as session start, session end, user prompts, and tool usage.",
    usage: "### How to Use Hooks

**What's Included:**
- Each hook is a folder containing a `README.md` file and a `hooks.json` configuration
- Hooks may include helper scripts, utilities, or other bundled assets

**To Install:**
- Copy the hook folder to your repository's `.github/hooks/` directory
- Ensure any bundled scripts are executable (`chmod +x script.sh`)
- Commit the hook to your repository's default branch

**To Activate/Use:**
- Hooks automatically execute during Copilot coding agent sessions
- Configure hook events in the `hooks.json` file
- Available events: `sessionStart`, `sessionEnd`, `userPromptSubmitted`, `preToolUse`, `postToolUse`, `errorOccurred`",
};

pub const WORKFLOWS: SectionText = SectionText {
    heading: "## ⚡ Agentic Workflows

[Agentic Workflows](https://github.github.com/gh-aw) are AI-powered repository automations that run coding agents in GitHub Actions. Defined in markdown with natural language instructions, they enable event-triggered and scheduled automation with built-in guardrails and security-first design.",
    usage: "### How to Use Agentic Workflows

**What's Included:**
- Each workflow is a single `.md` file with YAML frontmatter and natural language instructions
- Workflows are compiled to `.lock.yml` GitHub Actions files via `gh aw compile`

**To Install:**
- Install the `gh aw` CLI extension: `gh extension install github/gh-aw`
- Copy the workflow `.md` file to your repository's `.github/workflows/` directory
- Compile with `gh aw compile` to generate the `.lock.yml` file
- Commit both the `.md` and `.lock.yml` files

**To Activate/Use:**
- Workflows run automatically based on their configured triggers (schedules, events, slash commands)
- Use `gh aw run <workflow>` to trigger a manual run",
};

pub const PLUGINS: SectionText = SectionText {
    heading: "## 🔌 Plugins

Curated plugins of related prompts, agents, and skills organized around specific themes, workflows, or use cases. Plugins can be installed directly via GitHub Copilot CLI.",
    usage: "### How to Use Plugins

**Browse Plugins:**
- ⭐ Featured plugins are highlighted and appear at the top of the list
- Explore themed plugins that group related customizations
- Each plugin includes prompts, agents, and skills for specific workflows

**Install Plugins:**
- Use `copilot plugin install <plugin-name>@awesome-copilot` to install a plugin
- Or browse to the individual files to copy content manually",
};
