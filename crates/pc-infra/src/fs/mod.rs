pub mod local_file_reader;
pub mod profile_image_store;

pub use local_file_reader::FsLocalFileReader;
pub use profile_image_store::FsProfileImageStore;
