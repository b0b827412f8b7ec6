/*!
 * Core types and data structures for bundlefs
 */

/// Content of a scanned file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// Valid UTF-8 text
    Text(String),
    /// Bytes that are not valid UTF-8
    Binary,
    /// The file could not be read; holds the error message
    Unreadable(String),
}

/// Represents a file accepted by the scanner
#[derive(Debug, Clone)]
pub struct FileNode {
    /// File name
    pub name: String,
    /// Relative path from scan root, always `/` separated
    pub path: String,
    /// Size in bytes
    pub size: u64,
    /// File content
    pub content: FileContent,
}

/// Represents a directory in the scanned tree
#[derive(Debug, Clone)]
pub struct DirectoryNode {
    /// Directory name as rendered in the tree listing
    pub name: String,
    /// Relative path from scan root, `/` separated (empty for the root)
    pub path: String,
    /// Accepted files, sorted by name
    pub files: Vec<FileNode>,
    /// Accepted subdirectories, sorted by name
    pub directories: Vec<DirectoryNode>,
}

impl DirectoryNode {
    /// All files below this directory, sorted by relative path
    pub fn sorted_files(&self) -> Vec<&FileNode> {
        let mut files = Vec::new();
        self.collect_files(&mut files);
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files
    }

    fn collect_files<'a>(&'a self, out: &mut Vec<&'a FileNode>) {
        out.extend(self.files.iter());
        for dir in &self.directories {
            dir.collect_files(out);
        }
    }
}

/// A file decoded from a bundle document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Relative path exactly as written in the header
    pub path: String,
    /// Content to write, empty or newline terminated
    pub content: String,
    /// The entry held the binary sentinel rather than real content
    pub binary: bool,
}
