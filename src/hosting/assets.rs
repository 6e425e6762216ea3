use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::web;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Static files served next to the socket endpoint.
#[derive(Debug, Clone)]
pub struct Assets {
    root: PathBuf,
}

impl Assets {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
    /// Maps a request path onto the asset root. Anything that would climb out
    /// of the root resolves to nothing.
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        match relative.as_os_str().is_empty() {
            true => Some(self.root.join("index.html")),
            false => Some(self.root.join(relative)),
        }
    }
    fn mime(path: &Path) -> &'static str {
        match path.extension().and_then(|e| e.to_str()) {
            Some("html") => "text/html; charset=utf-8",
            Some("js") => "text/javascript; charset=utf-8",
            Some("css") => "text/css; charset=utf-8",
            Some("json") => "application/json",
            Some("svg") => "image/svg+xml",
            Some("png") => "image/png",
            Some("ico") => "image/x-icon",
            _ => "application/octet-stream",
        }
    }
}

pub async fn asset(assets: web::Data<Assets>, req: HttpRequest) -> HttpResponse {
    let Some(path) = assets.resolve(req.path()) else {
        return HttpResponse::NotFound().finish();
    };
    match tokio::fs::read(&path).await {
        Ok(bytes) => HttpResponse::Ok()
            .content_type(Assets::mime(&path))
            .body(bytes),
        Err(e) => {
            log::debug!("no asset at {}: {}", path.display(), e);
            HttpResponse::NotFound().finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn root_serves_index() {
        let assets = Assets::new(PathBuf::from("public"));
        assert_eq!(assets.resolve("/"), Some(PathBuf::from("public/index.html")));
    }
    #[test]
    fn nested_paths_resolve_under_root() {
        let assets = Assets::new(PathBuf::from("public"));
        assert_eq!(
            assets.resolve("/js/client.js"),
            Some(PathBuf::from("public/js/client.js"))
        );
    }
    #[test]
    fn traversal_is_refused() {
        let assets = Assets::new(PathBuf::from("public"));
        assert_eq!(assets.resolve("/../Cargo.toml"), None);
        assert_eq!(assets.resolve("/js/../../secret"), None);
    }
    #[test]
    fn mime_by_extension() {
        assert_eq!(Assets::mime(Path::new("a.js")), "text/javascript; charset=utf-8");
        assert_eq!(Assets::mime(Path::new("a.bin")), "application/octet-stream");
    }
}
