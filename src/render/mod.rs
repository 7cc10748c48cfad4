pub(crate) mod caption;
pub(crate) mod composite;
pub(crate) mod frame;
pub(crate) mod surface;
pub(crate) mod view;
pub(crate) mod watermark;
