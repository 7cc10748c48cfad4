pub(crate) mod gesture;
pub(crate) mod sequence;
pub(crate) mod sink;
pub(crate) mod snapshot;
