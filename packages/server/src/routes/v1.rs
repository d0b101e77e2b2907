use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::public::list_versions))
        .routes(routes!(handlers::public::get_eula))
        .nest("/admin", admin_routes())
        .nest("/shortcodes", shortcode_routes())
}

fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::admin::update_version_data))
        .routes(routes!(handlers::admin::update_eula))
        .routes(routes!(handlers::admin::purge))
}

fn shortcode_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::shortcode::render_shortcode))
}
