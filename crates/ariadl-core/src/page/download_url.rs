//! Watch URL → download page URL.

use url::Url;

/// Download page for the episode a watch URL points at:
/// `<origin>/download?v=<v>`. A watch URL without `v` yields `v=null`.
pub fn download_page_url(watch: &Url) -> Url {
    let video_id = watch
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_else(|| "null".to_string());

    let mut url = watch.clone();
    // Credentials are not part of the origin; failures only occur for
    // cannot-be-a-base URLs, which have none to clear.
    let _ = url.set_username("");
    let _ = url.set_password(None);
    url.set_path("/download");
    url.set_query(None);
    url.query_pairs_mut().append_pair("v", &video_id);
    url.set_fragment(None);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive(watch: &str) -> String {
        download_page_url(&Url::parse(watch).unwrap()).to_string()
    }

    #[test]
    fn keeps_origin_and_only_v() {
        assert_eq!(
            derive("https://site.test/watch?list=abc&v=42&t=10#comments"),
            "https://site.test/download?v=42"
        );
    }

    #[test]
    fn keeps_port() {
        assert_eq!(
            derive("http://127.0.0.1:8080/watch?v=7"),
            "http://127.0.0.1:8080/download?v=7"
        );
    }

    #[test]
    fn missing_v_becomes_null() {
        assert_eq!(
            derive("https://site.test/watch"),
            "https://site.test/download?v=null"
        );
        assert_eq!(
            derive("https://site.test/watch?list=abc"),
            "https://site.test/download?v=null"
        );
    }

    #[test]
    fn drops_credentials_and_path() {
        assert_eq!(
            derive("https://user:pw@site.test/a/b/watch?v=9"),
            "https://site.test/download?v=9"
        );
    }
}
