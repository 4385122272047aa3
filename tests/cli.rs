//! Smoke tests for the `imgpress` binary.

use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn imgpress(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_imgpress"))
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .unwrap()
}

fn write_png(path: &Path, width: u32, height: u32) {
    RgbaImage::from_pixel(width, height, Rgba([10, 200, 30, 255]))
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

#[test]
fn gen_config_prints_parseable_toml() {
    let tmp = TempDir::new().unwrap();
    let out = imgpress(tmp.path(), &["gen-config"]);
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    let value: toml::Value = toml::from_str(&text).unwrap();
    assert_eq!(value["output"]["format"].as_str(), Some("webp"));
}

#[test]
fn batch_writes_archive_and_report() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("in");
    std::fs::create_dir(&input).unwrap();
    write_png(&input.join("a.png"), 40, 20);
    write_png(&input.join("b.png"), 20, 40);
    std::fs::write(input.join("c.png"), b"not really a png").unwrap();

    let out = imgpress(
        tmp.path(),
        &[
            "batch",
            "in",
            "-o",
            "out/result.zip",
            "--report",
            "report.json",
            "--format",
            "png",
            "--scale",
            "50",
        ],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Loaded 3 image(s)"));
    assert!(stdout.contains("Compressed 2 of 3 image(s); 1 failed"));

    let archive = std::fs::read(tmp.path().join("out/result.zip")).unwrap();
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    assert_eq!(zip.len(), 2);
    let mut entry = zip.by_name("a.png").unwrap();
    let mut bytes = Vec::new();
    std::io::Read::read_to_end(&mut entry, &mut bytes).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (20, 10));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(tmp.path().join("report.json")).unwrap())
            .unwrap();
    assert_eq!(report["scale_percent"], 50);
    assert_eq!(report["failed"][0]["name"], "c.png");
}

#[test]
fn single_uses_compressed_prefix_and_config_file() {
    let tmp = TempDir::new().unwrap();
    write_png(&tmp.path().join("photo.png"), 30, 30);
    std::fs::write(
        tmp.path().join("imgpress.toml"),
        "[output]\nformat = \"png\"\n\n[effects]\nfilter = \"grayscale\"\n",
    )
    .unwrap();

    let out = imgpress(tmp.path(), &["single", "photo.png"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let decoded = image::open(tmp.path().join("compressed-photo.png"))
        .unwrap()
        .to_rgba8();
    let p = decoded.get_pixel(0, 0).0;
    assert_eq!(p[0], p[1]);
    assert_eq!(p[1], p[2]);
}

#[test]
fn single_rejects_non_image() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("notes.txt"), b"hello").unwrap();

    let out = imgpress(tmp.path(), &["single", "notes.txt"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Invalid file type. Please select an image file."));
}

#[test]
fn bad_config_value_fails() {
    let tmp = TempDir::new().unwrap();
    write_png(&tmp.path().join("p.png"), 4, 4);
    let out = imgpress(tmp.path(), &["single", "p.png", "--scale", "5"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("scale_percent"));
}

#[test]
fn anchor_alone_leaves_image_uncropped() {
    let tmp = TempDir::new().unwrap();
    write_png(&tmp.path().join("p.png"), 12, 8);
    let out = imgpress(
        tmp.path(),
        &["single", "p.png", "--format", "png", "--anchor", "top-left"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let decoded = image::open(tmp.path().join("compressed-p.png")).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (12, 8));
}
