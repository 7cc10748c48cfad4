pub(crate) mod source;
pub(crate) mod try_on_session;
