use std::path::Path;

use tracing::debug;
use url::Url;

use super::version::version_token;
use crate::asset::AssetDescriptor;
use crate::config::ThemeEnvironment;
use crate::error::LoaderResult;

/// Move the version from the query string into the file name.
///
/// `/js/app.js?ver=2.42` becomes `/js/app.2_42.js` and the version is cleared, since the
/// server-side rewrite rules map the versioned name back onto the real file.
pub fn cachebust_file_name(
  mut asset: AssetDescriptor,
  environment: &ThemeEnvironment,
) -> LoaderResult<AssetDescriptor> {
  if !environment.cachebust_filenames {
    return Ok(asset);
  }

  let Some(version) = asset.version() else {
    return Ok(asset);
  };

  if let Some(src) = asset.src() {
    let busted = cachebust_src(src, &version_token(&version));
    debug!(handle = asset.handle(), src = %busted, "cache-busted file name");
    asset.set_src(busted);
  }
  asset.set_version(None);

  Ok(asset)
}

/// Insert `.<version>` before the extension of `src`, dropping any query or fragment.
///
/// Sources without a host are reassembled from their path alone, and scheme-relative sources
/// keep their leading `//`, so the result never contains a dangling `://`. Paths of sources
/// with a host come back normalised: dot segments are resolved and unsafe characters are
/// percent-encoded.
pub fn cachebust_src(src: &str, version: &str) -> String {
  let parts = SourceParts::parse(src);
  format!("{}{}", parts.origin, insert_version(&parts.path, version))
}

struct SourceParts {
  origin: String,
  path: String,
}

impl SourceParts {
  fn parse(src: &str) -> Self {
    if let Ok(url) = Url::parse(src)
      && let Some(origin) = authority(&url, &format!("{}://", url.scheme()))
    {
      return Self {
        origin,
        path: url.path().to_string(),
      };
    }

    if src.starts_with("//")
      && let Ok(url) = Url::parse(&format!("https:{src}"))
      && let Some(origin) = authority(&url, "//")
    {
      return Self {
        origin,
        path: url.path().to_string(),
      };
    }

    let end = src.find(['?', '#']).unwrap_or(src.len());
    Self {
      origin: String::new(),
      path: src[..end].to_string(),
    }
  }
}

fn authority(url: &Url, prefix: &str) -> Option<String> {
  let host = url.host_str()?;
  Some(match url.port() {
    Some(port) => format!("{prefix}{host}:{port}"),
    None => format!("{prefix}{host}"),
  })
}

fn insert_version(path: &str, version: &str) -> String {
  let Some(extension) = Path::new(path).extension().and_then(|ext| ext.to_str()) else {
    return path.to_string();
  };

  match path.strip_suffix(&format!(".{extension}")) {
    Some(stem) => format!("{stem}.{version}.{extension}"),
    None => path.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn enabled() -> ThemeEnvironment {
    ThemeEnvironment {
      cachebust_filenames: true,
      ..ThemeEnvironment::default()
    }
  }

  #[test]
  fn moves_version_into_file_name() {
    let asset = AssetDescriptor::script(
      "app",
      json!({"src": "https://host/js/app.js", "version": "2.42"}),
    );
    let asset = cachebust_file_name(asset, &enabled()).unwrap();

    assert_eq!(asset.src(), Some("https://host/js/app.2_42.js"));
    assert_eq!(asset.version(), None);
  }

  #[test]
  fn disabled_flag_keeps_query_versioning() {
    let asset = AssetDescriptor::script(
      "app",
      json!({"src": "https://host/js/app.js", "version": "2.42"}),
    );
    let asset = cachebust_file_name(asset, &ThemeEnvironment::default()).unwrap();

    assert_eq!(asset.src(), Some("https://host/js/app.js"));
    assert_eq!(asset.version().as_deref(), Some("2.42"));
  }

  #[test]
  fn unversioned_assets_are_untouched() {
    let asset = AssetDescriptor::style("main", json!({"src": "https://host/style.css?x=1"}));
    let asset = cachebust_file_name(asset, &enabled()).unwrap();
    assert_eq!(asset.src(), Some("https://host/style.css?x=1"));
  }

  #[test]
  fn drops_query_and_fragment() {
    assert_eq!(
      cachebust_src("https://host/css/main.css?ver=3#top", "3"),
      "https://host/css/main.3.css"
    );
  }

  #[test]
  fn keeps_explicit_ports() {
    assert_eq!(
      cachebust_src("http://localhost:8080/js/app.js", "7"),
      "http://localhost:8080/js/app.7.js"
    );
  }

  #[test]
  fn only_the_final_extension_receives_the_version() {
    assert_eq!(
      cachebust_src("https://host/js/app.min.js", "1_0"),
      "https://host/js/app.min.1_0.js"
    );
  }

  #[test]
  fn scheme_relative_sources_keep_their_prefix() {
    assert_eq!(
      cachebust_src("//cdn.example/lib/jquery.js?ver=3.7", "3_7"),
      "//cdn.example/lib/jquery.3_7.js"
    );
  }

  #[test]
  fn relative_sources_fall_back_to_their_path() {
    assert_eq!(cachebust_src("js/app.js?ver=1", "1"), "js/app.1.js");
    assert_eq!(cachebust_src("/js/app.js", "1"), "/js/app.1.js");
  }

  #[test]
  fn absolute_paths_are_normalised() {
    assert_eq!(
      cachebust_src("https://host/js/../lib/app.js", "1"),
      "https://host/lib/app.1.js"
    );
    assert_eq!(
      cachebust_src("https://host/js/my app.js", "1"),
      "https://host/js/my%20app.1.js"
    );
    assert_eq!(cachebust_src("js/my app.js", "1"), "js/my app.1.js");
  }

  #[test]
  fn extensionless_paths_are_left_alone() {
    assert_eq!(cachebust_src("https://host/api/script", "2"), "https://host/api/script");

    let asset = AssetDescriptor::script(
      "api",
      json!({"src": "https://host/api/script?ver=2", "version": "2"}),
    );
    let asset = cachebust_file_name(asset, &enabled()).unwrap();
    assert_eq!(asset.src(), Some("https://host/api/script"));
    assert_eq!(asset.version(), None);
  }
}
