use askama::Template;
use askama_web::WebTemplate;

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub label: String,
    pub poll_interval_ms: u64,
    pub max_zoom: u8,
}
