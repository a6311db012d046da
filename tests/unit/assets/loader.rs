use std::io::Cursor;

use super::*;

fn png_data_url(rgba: [u8; 4]) -> String {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&buf)
    )
}

#[test]
fn parse_classifies_references() {
    assert_eq!(
        ImageRef::parse("https://host/a.png"),
        ImageRef::Url("https://host/a.png".to_string())
    );
    assert_eq!(
        ImageRef::parse("HTTP://host/a.png"),
        ImageRef::Url("HTTP://host/a.png".to_string())
    );
    assert!(matches!(ImageRef::parse("data:image/png;base64,AA=="), ImageRef::DataUrl(_)));
    assert_eq!(
        ImageRef::parse("file:///tmp/a.png"),
        ImageRef::Path(PathBuf::from("/tmp/a.png"))
    );
    assert_eq!(
        ImageRef::parse("assets/bar.png"),
        ImageRef::Path(PathBuf::from("assets/bar.png"))
    );
}

#[test]
fn data_url_base64_and_percent_payloads() {
    assert_eq!(decode_data_url("data:text/plain;base64,aGk=").unwrap(), b"hi");
    assert_eq!(decode_data_url("data:,a%20b").unwrap(), b"a b");
    assert!(decode_data_url("data:;base64").is_err());
    assert!(decode_data_url("nope:,x").is_err());
    assert_eq!(decode_data_url("data:,%3Csvg%3E").unwrap(), b"<svg>");
    // stray escapes pass through literally
    assert_eq!(decode_data_url("data:,%4").unwrap(), b"%4");
}

#[test]
fn zero_timeout_is_rejected() {
    let err = ImageLoader::new(LoaderOpts {
        timeout_ms: 0,
        ..LoaderOpts::default()
    })
    .err()
    .unwrap();
    assert!(matches!(err, IngotError::Validation(_)));
}

#[tokio::test]
async fn loads_data_url_bitmap() {
    let loader = ImageLoader::new(LoaderOpts::default()).unwrap();
    let bmp = loader
        .load(&ImageRef::parse(&png_data_url([10, 20, 30, 255])))
        .await
        .unwrap();
    assert_eq!((bmp.width, bmp.height), (2, 2));
    assert_eq!(bmp.pixel(0, 0), Some([10, 20, 30, 255]));
}

#[tokio::test]
async fn missing_file_is_network_failure_and_bad_bytes_decode_failure() {
    let loader = ImageLoader::new(LoaderOpts::default()).unwrap();
    let err = loader
        .load(&ImageRef::Path(PathBuf::from("/definitely/not/here.png")))
        .await
        .unwrap_err();
    assert!(matches!(err, IngotError::NetworkFailure(_)), "{err}");

    let err = loader
        .load(&ImageRef::parse("data:image/png;base64,aGVsbG8="))
        .await
        .unwrap_err();
    assert!(matches!(err, IngotError::DecodeFailure(_)), "{err}");
}

#[tokio::test]
async fn cache_survives_source_removal() {
    let dir = std::env::temp_dir().join(format!("ingot-loader-cache-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("base.png");
    image::RgbaImage::from_pixel(3, 1, image::Rgba([1, 2, 3, 255]))
        .save(&path)
        .unwrap();

    let loader = ImageLoader::new(LoaderOpts::default()).unwrap();
    let r = ImageRef::Path(path.clone());
    let first = loader.load(&r).await.unwrap();
    std::fs::remove_file(&path).unwrap();
    let second = loader.load(&r).await.unwrap();
    assert_eq!(first, second);

    loader.clear_cache().await;
    assert!(loader.load(&r).await.is_err());
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn load_pair_reports_each_side() {
    let loader = ImageLoader::new(LoaderOpts::default()).unwrap();
    let base = ImageRef::parse(&png_data_url([200, 180, 40, 255]));
    let logo = ImageRef::Path(PathBuf::from("/no/such/logo.png"));

    let (b, l) = loader.load_pair(&base, Some(&logo)).await;
    assert!(b.is_ok());
    assert!(matches!(l, Some(Err(IngotError::NetworkFailure(_)))));

    let (b, l) = loader.load_pair(&base, None).await;
    assert!(b.is_ok());
    assert!(l.is_none());
}

#[tokio::test]
async fn data_urls_are_not_cached() {
    let loader = ImageLoader::new(LoaderOpts::default()).unwrap();
    for i in 0..40u8 {
        loader
            .load(&ImageRef::parse(&png_data_url([i, 0, 0, 255])))
            .await
            .unwrap();
    }
    assert_eq!(loader.cached_len().await, 0);
}

#[tokio::test]
async fn cache_evicts_least_recently_used() {
    let dir = std::env::temp_dir().join(format!("ingot-loader-lru-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let refs: Vec<ImageRef> = (0..3u8)
        .map(|i| {
            let path = dir.join(format!("img{i}.png"));
            image::RgbaImage::from_pixel(1, 1, image::Rgba([i, 0, 0, 255]))
                .save(&path)
                .unwrap();
            ImageRef::Path(path)
        })
        .collect();

    let loader = ImageLoader::new(LoaderOpts {
        cache_capacity: 2,
        ..LoaderOpts::default()
    })
    .unwrap();
    for r in &refs {
        loader.load(r).await.unwrap();
    }
    assert_eq!(loader.cached_len().await, 2);

    let _ = std::fs::remove_dir_all(&dir);
    assert!(loader.load(&refs[2]).await.is_ok());
    assert!(loader.load(&refs[1]).await.is_ok());
    assert!(matches!(
        loader.load(&refs[0]).await,
        Err(IngotError::NetworkFailure(_))
    ));
}

#[test]
fn zero_cache_capacity_is_rejected() {
    let err = ImageLoader::new(LoaderOpts {
        cache_capacity: 0,
        ..LoaderOpts::default()
    })
    .err()
    .unwrap();
    assert!(matches!(err, IngotError::Validation(_)));
    assert!(
        ImageLoader::new(LoaderOpts {
            cache: false,
            cache_capacity: 0,
            ..LoaderOpts::default()
        })
        .is_ok()
    );
}
