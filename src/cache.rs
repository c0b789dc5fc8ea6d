//! Idempotent materialization of Parquet assets into the local cache tree.

use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;

use crate::classify::{classify, is_volatile};
use crate::client::StacClient;
use crate::error::{Error, Result};
use crate::stac::Item;
use crate::util::filename_from_url;

/// Downloads every Parquet asset of `items` into `output_dir`.
///
/// Files are placed in a per-category subdirectory when the filename
/// classifies, directly under `output_dir` otherwise. An asset whose target
/// already exists is skipped unless its name carries the volatile marker,
/// in which case it is re-downloaded and overwritten. Side effects are
/// strictly additive or overwriting; stale files are never removed.
pub fn materialize_assets(client: &StacClient, items: &[Item], output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir).map_err(|source| Error::Storage {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let assets: Vec<_> = items
        .iter()
        .flat_map(|item| item.assets.values())
        .filter(|asset| asset.is_parquet())
        .collect();

    let pb = ProgressBar::new(assets.len() as u64).with_message("Materializing assets");
    pb.set_style(
        ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {pos:>4}/{len:4} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    for asset in assets {
        let Some(file_name) = filename_from_url(&asset.href) else {
            pb.println(format!(
                "Warning: cannot derive a filename from {}, skipping",
                asset.href
            ));
            pb.inc(1);
            continue;
        };

        let target_dir = match classify(&file_name) {
            Some(category) => output_dir.join(category.as_str()),
            None => output_dir.to_path_buf(),
        };
        fs::create_dir_all(&target_dir).map_err(|source| Error::Storage {
            path: target_dir.clone(),
            source,
        })?;

        let target = target_dir.join(&file_name);

        if target.exists() && !is_volatile(&file_name) {
            pb.println(format!("File {} already exists, skipping...", file_name));
            pb.inc(1);
            continue;
        }

        pb.println(format!(
            "Downloading {} to {}...",
            asset.href,
            target.display()
        ));
        client.download(&asset.href, &target)?;
        pb.println(format!("Downloaded {}.", file_name));
        pb.inc(1);
    }

    pb.finish_with_message("Assets materialized");
    Ok(())
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn item_with_assets(assets: serde_json::Value) -> Item {
        serde_json::from_value(json!({"id": "it", "assets": assets})).unwrap()
    }

    fn parquet_asset(href: &str) -> serde_json::Value {
        json!({"href": href, "type": "application/vnd.apache.parquet"})
    }

    #[test]
    fn should_place_assets_into_category_subdirectories() {
        let mut server = mockito::Server::new();
        let _forest = server
            .mock("GET", "/f/vhi_forest_2024.parquet")
            .with_body("forest-bytes")
            .create();
        let _vegetation = server
            .mock("GET", "/f/vhi_vegetation_2024.parquet")
            .with_body("vegetation-bytes")
            .create();
        let _loose = server
            .mock("GET", "/f/vhi_notes_2024.parquet")
            .with_body("loose-bytes")
            .create();
        let thumb = server
            .mock("GET", "/f/vhi_forest_2024.png")
            .with_body("png")
            .expect(0)
            .create();

        let items = vec![item_with_assets(json!({
            "forest": parquet_asset(&format!("{}/f/vhi_forest_2024.parquet", server.url())),
            "vegetation": parquet_asset(&format!("{}/f/vhi_vegetation_2024.parquet", server.url())),
            "notes": parquet_asset(&format!("{}/f/vhi_notes_2024.parquet", server.url())),
            "thumb": {"href": format!("{}/f/vhi_forest_2024.png", server.url()),
                      "type": "image/png"},
        }))];

        let dir = TempDir::new().unwrap();
        let client = StacClient::new(&server.url()).unwrap();
        materialize_assets(&client, &items, dir.path()).unwrap();

        assert_eq!(
            fs::read(dir.path().join("forest/vhi_forest_2024.parquet")).unwrap(),
            b"forest-bytes"
        );
        assert_eq!(
            fs::read(dir.path().join("vegetation/vhi_vegetation_2024.parquet")).unwrap(),
            b"vegetation-bytes"
        );
        assert_eq!(
            fs::read(dir.path().join("vhi_notes_2024.parquet")).unwrap(),
            b"loose-bytes"
        );
        // Non-Parquet assets are never requested.
        thumb.assert();
    }

    #[test]
    fn should_skip_existing_files_on_second_run() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/f/vhi_forest_2024.parquet")
            .with_body("forest-bytes")
            .expect(1)
            .create();

        let items = vec![item_with_assets(json!({
            "forest": parquet_asset(&format!("{}/f/vhi_forest_2024.parquet", server.url())),
        }))];

        let dir = TempDir::new().unwrap();
        let client = StacClient::new(&server.url()).unwrap();
        materialize_assets(&client, &items, dir.path()).unwrap();
        materialize_assets(&client, &items, dir.path()).unwrap();

        mock.assert();
        assert_eq!(
            fs::read(dir.path().join("forest/vhi_forest_2024.parquet")).unwrap(),
            b"forest-bytes"
        );
    }

    #[test]
    fn should_redownload_volatile_files_every_run() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/f/vhi_forest_current_mosaic.parquet")
            .with_body("fresh-bytes")
            .expect(2)
            .create();

        let items = vec![item_with_assets(json!({
            "forest": parquet_asset(&format!(
                "{}/f/vhi_forest_current_mosaic.parquet",
                server.url()
            )),
        }))];

        let dir = TempDir::new().unwrap();
        let client = StacClient::new(&server.url()).unwrap();
        materialize_assets(&client, &items, dir.path()).unwrap();
        materialize_assets(&client, &items, dir.path()).unwrap();

        mock.assert();
    }

    #[test]
    fn should_abort_on_failed_download() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/f/vhi_forest_2024.parquet")
            .with_status(404)
            .with_body("not found")
            .create();

        let items = vec![item_with_assets(json!({
            "forest": parquet_asset(&format!("{}/f/vhi_forest_2024.parquet", server.url())),
        }))];

        let dir = TempDir::new().unwrap();
        let client = StacClient::new(&server.url()).unwrap();
        let err = materialize_assets(&client, &items, dir.path()).unwrap_err();

        assert!(err.is_request());
        assert!(!dir.path().join("forest/vhi_forest_2024.parquet").exists());
    }
}
