use axum::response::Html;

const UPLOAD_FORM: &str = include_str!("../../../assets/index.html");

pub async fn index_handler() -> Html<&'static str> {
    Html(UPLOAD_FORM)
}
