//! Browser capability bridge implementations for `platform_host_web` service adapters.
//!
//! This module is organized by host domain (`content`, `external_url`) while routing the
//! actual browser calls through `interop`.

mod interop;

pub(crate) use interop::TextResponse;

pub async fn open_external_url(url: &str) -> Result<(), String> {
    interop::open_external_url(url).await
}

pub async fn fetch_text(url: &str) -> Result<TextResponse, String> {
    interop::fetch_text(url).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn bridge_public_api_non_wasm_parity() {
        let expected = "Browser APIs are only available when compiled for wasm32".to_string();

        assert_eq!(
            block_on(open_external_url("https://example.com")).expect_err("open should fail"),
            expected
        );
        assert_eq!(
            block_on(fetch_text("content/contact.md")).expect_err("fetch should fail"),
            expected
        );
    }
}
