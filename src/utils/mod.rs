pub mod path_validator;

pub use path_validator::{FsPathResolver, PathResolver, PathValidator};
