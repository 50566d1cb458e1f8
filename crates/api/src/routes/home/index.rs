/// Routes listed by the index page, in the order they are documented
pub const AVAILABLE_ROUTES: &[&str] = &[
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/2016-08-31",
    "/api/v1.0/2016-08-31/2017-01-31",
];

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = OK, description = "Plain text listing of the available routes", content_type = "text/plain", body = String),
    ))]
pub async fn index_handler() -> String {
    let mut listing = String::from("Available Routes:\n");
    for route in AVAILABLE_ROUTES {
        listing.push_str(route);
        listing.push('\n');
    }
    listing
}
