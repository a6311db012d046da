pub(crate) mod bitmap;
pub(crate) mod decode;
pub(crate) mod loader;
pub(crate) mod text;
