pub(crate) mod place;
pub(crate) mod wrap;
