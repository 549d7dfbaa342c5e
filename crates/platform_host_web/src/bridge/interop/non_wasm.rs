use super::TextResponse;

fn unsupported() -> String {
    "Browser APIs are only available when compiled for wasm32".to_string()
}

pub async fn open_external_url(_url: &str) -> Result<(), String> {
    Err(unsupported())
}

pub async fn fetch_text(_url: &str) -> Result<TextResponse, String> {
    Err(unsupported())
}
