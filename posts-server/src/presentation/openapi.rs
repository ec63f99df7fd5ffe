use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::handlers::posts::{PostDto, PostRequestDto, RatingRequestDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::posts::create_post,
        crate::presentation::handlers::posts::update_post,
        crate::presentation::handlers::posts::get_post,
        crate::presentation::handlers::posts::list_posts,
        crate::presentation::handlers::posts::delete_post,
        crate::presentation::handlers::posts::rate_post,
        crate::presentation::handlers::posts::unrate_post
    ),
    components(
        schemas(
            PostRequestDto,
            RatingRequestDto,
            PostDto
        )
    ),
    tags(
        (name = "posts", description = "Blog post and rating endpoints")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "basic_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
        );
        openapi.components = Some(components);
    }
}
