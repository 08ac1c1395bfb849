pub(crate) mod decode;
pub(crate) mod tensor;
