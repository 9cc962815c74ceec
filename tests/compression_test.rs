use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tempfile::tempdir;

use mmadapt::file_ops::{compress_file, decompress_file, decompress_files};

fn write_gzip(path: &PathBuf, content: &[u8]) {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content).unwrap();
    fs::write(path, encoder.finish().unwrap()).unwrap();
}

#[test]
fn test_round_trip_restores_content() {
    let temp_dir = tempdir().unwrap();
    let original = temp_dir.path().join("data.txt");
    let content: Vec<u8> = (0..10_000u32).flat_map(|i| i.to_le_bytes()).collect();
    fs::write(&original, &content).unwrap();

    let compressed = compress_file(&original, "g", None, false).unwrap();
    assert_eq!(compressed, temp_dir.path().join("gdata.txt.gz"));
    assert!(original.exists(), "original is kept by default");

    let restored = decompress_file(&compressed, "u", None).unwrap();
    assert_eq!(restored, temp_dir.path().join("ugdata.txt"));
    assert_eq!(fs::read(&restored).unwrap(), content);
}

#[cfg(unix)]
#[test]
fn test_outputs_get_regular_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = tempdir().unwrap();
    let original = temp_dir.path().join("data.txt");
    fs::write(&original, "payload").unwrap();
    let mode_of = |path: &PathBuf| fs::metadata(path).unwrap().permissions().mode() & 0o777;

    let compressed = compress_file(&original, "g", None, false).unwrap();
    let restored = decompress_file(&compressed, "u", None).unwrap();

    assert_eq!(mode_of(&compressed), mode_of(&original));
    assert_eq!(mode_of(&restored), mode_of(&original));
}

#[test]
fn test_compressed_output_is_plain_gzip() {
    let temp_dir = tempdir().unwrap();
    let original = temp_dir.path().join("notes.md");
    fs::write(&original, "# title\nbody\n").unwrap();

    let compressed = compress_file(&original, "", None, false).unwrap();
    assert_eq!(compressed, temp_dir.path().join("notes.md.gz"));

    let mut decoded = String::new();
    GzDecoder::new(fs::File::open(&compressed).unwrap())
        .read_to_string(&mut decoded)
        .unwrap();
    assert_eq!(decoded, "# title\nbody\n");
}

#[test]
fn test_compress_gzip_file_is_a_no_op() {
    let temp_dir = tempdir().unwrap();
    let already = temp_dir.path().join("func.nii.gz");
    write_gzip(&already, b"volume");
    let before = fs::read(&already).unwrap();

    let result = compress_file(&already, "g", None, true).unwrap();

    assert_eq!(result, already);
    assert_eq!(fs::read(&already).unwrap(), before, "never re-compressed");
    assert_eq!(
        fs::read_dir(temp_dir.path()).unwrap().count(),
        1,
        "no file written and nothing removed"
    );
}

#[test]
fn test_compress_remove_original() {
    let temp_dir = tempdir().unwrap();
    let original = temp_dir.path().join("scan.nii");
    fs::write(&original, b"voxels").unwrap();

    let compressed = compress_file(&original, "g", None, true).unwrap();

    assert!(!original.exists());
    assert!(compressed.exists());
}

#[test]
fn test_output_directory() {
    let temp_dir = tempdir().unwrap();
    let output_dir = temp_dir.path().join("out");
    fs::create_dir(&output_dir).unwrap();
    let source = temp_dir.path().join("image.nii.gz");
    write_gzip(&source, b"voxels");

    let result = decompress_file(&source, "u", Some(&output_dir)).unwrap();

    assert_eq!(result, output_dir.join("uimage.nii"));
    assert_eq!(fs::read(&result).unwrap(), b"voxels");
}

#[test]
fn test_missing_inputs_are_validation_errors() {
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("missing.gz");

    let error = decompress_file(&missing, "u", None).unwrap_err();
    assert!(error.is_validation());
    assert!(error.to_string().contains("is not a valid filename"));

    let error = compress_file(&missing, "g", None, false).unwrap_err();
    assert!(error.is_validation());
}

#[test]
fn test_missing_output_directory_fails_before_any_write() {
    let temp_dir = tempdir().unwrap();
    let source = temp_dir.path().join("data.txt");
    fs::write(&source, "x").unwrap();
    let nowhere = temp_dir.path().join("nowhere");

    let error = compress_file(&source, "g", Some(&nowhere), true).unwrap_err();
    assert!(error.is_validation());
    assert!(error.to_string().contains("is not a valid directory"));
    assert!(source.exists());
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
}

#[test]
fn test_decompress_passes_through_unrecognized_files() {
    let temp_dir = tempdir().unwrap();
    let plain = temp_dir.path().join("table.txt");
    fs::write(&plain, "1 2").unwrap();

    assert_eq!(decompress_file(&plain, "u", None).unwrap(), plain);
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
}

#[test]
fn test_decompress_batch_keeps_order() {
    let temp_dir = tempdir().unwrap();
    let first = temp_dir.path().join("b.nii.gz");
    let second = temp_dir.path().join("a.txt");
    let third = temp_dir.path().join("c.nii.gz");
    write_gzip(&first, b"first");
    fs::write(&second, b"second").unwrap();
    write_gzip(&third, b"third");

    let results =
        decompress_files(&[first.clone(), second.clone(), third.clone()], "u", None).unwrap();

    assert_eq!(
        results,
        vec![
            temp_dir.path().join("ub.nii"),
            second,
            temp_dir.path().join("uc.nii"),
        ]
    );
    assert_eq!(fs::read(&results[2]).unwrap(), b"third");
}

#[test]
fn test_decompress_batch_stops_at_first_failure() {
    let temp_dir = tempdir().unwrap();
    let good = temp_dir.path().join("good.gz");
    let missing = temp_dir.path().join("missing.gz");
    let never = temp_dir.path().join("never.gz");
    write_gzip(&good, b"ok");
    write_gzip(&never, b"later");

    let error = decompress_files(&[good, missing, never], "u", None).unwrap_err();

    assert!(error.is_validation());
    assert!(
        temp_dir.path().join("ugood").exists(),
        "earlier outputs are kept"
    );
    assert!(
        !temp_dir.path().join("unever").exists(),
        "later items are not processed"
    );
}

#[test]
fn test_decompress_empty_batch() {
    assert!(decompress_files(&[], "u", None).unwrap().is_empty());
}
