pub(crate) mod feeds;
pub(crate) mod geometry;
pub(crate) mod landmarks;
pub(crate) mod smoother;
pub(crate) mod state;
