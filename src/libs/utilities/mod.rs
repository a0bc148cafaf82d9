// Declares the helper modules shared by the managers in `libs`.

// HTTP transport and download-to-file.
pub mod assets;
// tar.gz and zip extraction with wrapper stripping.
pub mod compression;
// Stream copying, rc files and recursive directory copies.
pub mod file_operations;
// Host OS/architecture and their distribution tokens.
pub mod platform;
