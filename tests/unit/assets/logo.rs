use std::io::Cursor;

use base64::Engine as _;

use super::*;

fn png_base64(px: [u8; 4]) -> String {
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    base64::engine::general_purpose::STANDARD.encode(buf)
}

fn fetcher() -> LogoFetcher {
    LogoFetcher::new(Duration::from_millis(500)).unwrap()
}

#[test]
fn data_uri_base64_and_percent_payloads() {
    let b64 = format!("data:image/png;base64,{}", png_base64([1, 2, 3, 255]));
    let bytes = decode_data_uri(&b64).unwrap();
    assert!(bytes.starts_with(b"\x89PNG"));

    let svg = decode_data_uri("data:image/svg+xml,%3Csvg%20xmlns%3D%22x%22%2F%3E").unwrap();
    assert_eq!(svg, br#"<svg xmlns="x"/>"#);

    assert!(decode_data_uri("data:image/png;base64").is_err());
    assert!(decode_data_uri("data:image/png;base64,!!!").is_err());
}

#[test]
fn percent_payloads_keep_incomplete_escapes() {
    assert_eq!(decode_data_uri("data:,a%20b").unwrap(), b"a b");
    assert_eq!(decode_data_uri("data:,100%").unwrap(), b"100%");
    assert_eq!(decode_data_uri("data:,%zz%4").unwrap(), b"%zz%4");
    assert_eq!(decode_data_uri("data:,a+b").unwrap(), b"a+b");
}

#[tokio::test]
async fn fetch_rejects_unsupported_schemes() {
    let f = fetcher();
    assert!(matches!(
        f.fetch("ftp://example.com/logo.png").await,
        Err(OgError::Fetch(_))
    ));
    assert!(f.fetch("file:///etc/passwd").await.is_err());
    assert!(f.fetch("not a url").await.is_err());
}

#[tokio::test]
async fn fetch_enforces_size_cap_on_data_uris() {
    let f = fetcher().with_max_bytes(8);
    let src = format!("data:image/png;base64,{}", png_base64([0, 0, 0, 255]));
    assert!(f.fetch(&src).await.is_err());
}

#[tokio::test]
async fn load_decodes_inline_logo() {
    let src = format!("data:image/png;base64,{}", png_base64([255, 0, 0, 255]));
    let logo = fetcher().load(&src).await.expect("logo");
    assert_eq!((logo.width, logo.height), (LOGO_SIZE, LOGO_SIZE));
    assert_eq!(&logo.rgba8_premul[0..4], &[255, 0, 0, 255]);
}

#[tokio::test]
async fn load_fails_open() {
    let f = fetcher();
    assert!(f.load("data:text/plain,hello").await.is_none());
    assert!(f.load("http://127.0.0.1:9/logo.png").await.is_none());
}

#[tokio::test]
async fn load_gives_up_after_the_timeout() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // Accept and hold connections open without ever answering.
    let server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((sock, _)) = listener.accept().await {
            held.push(sock);
        }
    });

    let f = LogoFetcher::new(Duration::from_millis(300)).unwrap();
    let started = std::time::Instant::now();
    let logo = tokio::time::timeout(
        Duration::from_secs(5),
        f.load(&format!("http://{addr}/logo.png")),
    )
    .await
    .expect("load should respect its own timeout");
    let elapsed = started.elapsed();

    assert!(logo.is_none());
    assert!(elapsed >= Duration::from_millis(250), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(2), "{elapsed:?}");
    server.abort();
}
