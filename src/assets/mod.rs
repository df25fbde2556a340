pub(crate) mod color;
pub(crate) mod decode;
pub(crate) mod fonts;
pub(crate) mod logo;
