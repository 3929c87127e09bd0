mod directory;
mod frontmatter;
pub mod layout;
pub mod title;
mod write;

pub use directory::{
    FolderEntry, bundled_assets, copy_dir_recursive, count_files, file_name, list_files_with_suffix,
    list_subdirs, to_forward_slashes, walk_files,
};
pub use frontmatter::{
    Frontmatter, FrontmatterError, ParsedDocument, load_document, parse_document,
    parse_frontmatter, read_document, read_frontmatter, split_frontmatter,
};
pub use layout::RepositoryLayout;
pub use title::{TitleSource, TitleStrategy, derive_title};
pub use write::{WriteStatus, write_if_changed, write_json_if_changed};

/// Sorted, de-duplicated copy of `values`.
pub fn sorted_distinct<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let set: std::collections::BTreeSet<String> = values.into_iter().map(Into::into).collect();
    set.into_iter().collect()
}
