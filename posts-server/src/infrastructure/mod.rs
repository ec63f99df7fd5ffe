pub(crate) mod credentials;
pub(crate) mod logging;
pub(crate) mod settings;
