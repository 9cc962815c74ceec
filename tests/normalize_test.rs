use std::fs;

use ndarray::Axis;
use tempfile::tempdir;

use mmadapt::convert::{
    ArrayOutput, NormalizeOptions, ZeroVariance, load_matrix, normalize_array,
    normalize_array_with,
};

#[test]
fn test_normalize_in_place() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("input.txt");
    fs::write(&input, "1 3\n2 5\n3 7\n").unwrap();

    let result = normalize_array(&input).unwrap();

    assert_eq!(result, input);
    assert_eq!(
        fs::read_to_string(&input).unwrap(),
        "-1.22474487 -1.22474487\n0.00000000 0.00000000\n1.22474487 1.22474487\n"
    );
}

#[cfg(unix)]
#[test]
fn test_normalize_in_place_keeps_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("shared.txt");
    fs::write(&input, "1 3\n2 5\n3 7\n").unwrap();
    fs::set_permissions(&input, fs::Permissions::from_mode(0o644)).unwrap();

    normalize_array(&input).unwrap();

    let mode = fs::metadata(&input).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o644);
}

#[test]
fn test_normalized_columns_have_zero_mean_and_unit_deviation() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("motion.par");
    fs::write(
        &input,
        "0.1 -2.5 100\n0.4 -2.0 110\n0.2 -3.5 90\n0.9 -1.0 130\n0.3 -2.2 95\n",
    )
    .unwrap();

    let output = normalize_array_with(&input, &NormalizeOptions::default()).unwrap();
    assert_eq!(output, temp_dir.path().join("nmotion.par"));

    let matrix = load_matrix(&output).unwrap();
    assert_eq!(matrix.dim(), (5, 3));
    let means = matrix.mean_axis(Axis(0)).unwrap();
    let deviations = matrix.std_axis(Axis(0), 0.0);
    for column in 0..3 {
        assert!(means[column].abs() < 1e-6, "mean {}", means[column]);
        assert!(
            (deviations[column] - 1.0).abs() < 1e-6,
            "std {}",
            deviations[column]
        );
    }
}

#[test]
fn test_default_options_leave_input_untouched() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("table.txt");
    fs::write(&input, "1 3\n2 5\n3 7\n").unwrap();

    normalize_array_with(&input, &NormalizeOptions::default()).unwrap();

    assert_eq!(fs::read_to_string(&input).unwrap(), "1 3\n2 5\n3 7\n");
}

#[test]
fn test_explicit_output_path() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("table.txt");
    let output = temp_dir.path().join("z-scores.txt");
    fs::write(&input, "1\n2\n3\n").unwrap();

    let options = NormalizeOptions {
        output: ArrayOutput::Path(output.clone()),
        ..Default::default()
    };
    assert_eq!(normalize_array_with(&input, &options).unwrap(), output);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "-1.22474487\n0.00000000\n1.22474487\n"
    );
}

#[test]
fn test_zero_variance_propagates_nan() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("flat.txt");
    fs::write(&input, "1 4\n3 4\n").unwrap();

    normalize_array(&input).unwrap();

    assert_eq!(
        fs::read_to_string(&input).unwrap(),
        "-1.00000000 nan\n1.00000000 nan\n"
    );
}

#[test]
fn test_zero_variance_rejected_before_writing() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("flat.txt");
    fs::write(&input, "1 4\n3 4\n").unwrap();

    let options = NormalizeOptions {
        output: ArrayOutput::InPlace,
        zero_variance: ZeroVariance::Reject,
    };
    let error = normalize_array_with(&input, &options).unwrap_err();

    assert!(error.is_validation());
    assert!(error.to_string().contains("[1]"));
    assert_eq!(fs::read_to_string(&input).unwrap(), "1 4\n3 4\n");
}

#[test]
fn test_invalid_inputs() {
    let temp_dir = tempdir().unwrap();

    let missing = temp_dir.path().join("missing.txt");
    assert!(normalize_array(&missing).unwrap_err().is_validation());

    let garbage = temp_dir.path().join("garbage.txt");
    fs::write(&garbage, "a b\nc d\n").unwrap();
    assert!(normalize_array(&garbage).unwrap_err().is_format());
    assert_eq!(fs::read_to_string(&garbage).unwrap(), "a b\nc d\n");
}
