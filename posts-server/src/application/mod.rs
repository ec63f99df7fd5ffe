pub(crate) mod post_mapper;
pub(crate) mod post_service;
