use assert_fs::TempDir;
use assert_fs::prelude::*;
use proxy_runner::error::Error;
use proxy_runner::locate::BinaryLocator;

#[test]
fn test_resolves_literal_path() {
    let temp = TempDir::new().unwrap();
    let binary = temp.child("proxy-server");
    binary.touch().unwrap();

    let locator = BinaryLocator::new("", ':', None);
    let resolved = locator.resolve(binary.path().to_str().unwrap()).unwrap();

    assert_eq!(resolved, binary.path());
}

#[test]
fn test_resolves_from_search_path() {
    let temp = TempDir::new().unwrap();
    let empty_dir = temp.child("empty");
    empty_dir.create_dir_all().unwrap();
    let bin_dir = temp.child("bin");
    bin_dir.create_dir_all().unwrap();
    bin_dir.child("proxy-server").touch().unwrap();

    // the earlier, non-matching directory must be skipped
    let search = format!(
        "{}:{}",
        empty_dir.path().display(),
        bin_dir.path().display()
    );
    let locator = BinaryLocator::new(search, ':', None);
    let resolved = locator.resolve("proxy-server").unwrap();

    assert_eq!(resolved, bin_dir.child("proxy-server").path());
}

#[test]
fn test_missing_binary_is_a_configuration_error() {
    let temp = TempDir::new().unwrap();
    let locator = BinaryLocator::new(temp.path().display().to_string(), ':', None);

    let err = locator.resolve("no-such-binary").unwrap_err();

    assert!(matches!(err, Error::BinaryNotFound(name) if name == "no-such-binary"));
}

#[test]
fn test_suffix_is_appended_when_missing() {
    let temp = TempDir::new().unwrap();
    temp.child("proxy-server.bat").touch().unwrap();

    let locator = BinaryLocator::new(
        temp.path().display().to_string(),
        ';',
        Some(".bat".to_string()),
    );

    let expected = temp.child("proxy-server.bat");
    assert_eq!(locator.resolve("proxy-server").unwrap(), expected.path());
    // an already-suffixed name is not doubled up
    assert_eq!(locator.resolve("proxy-server.bat").unwrap(), expected.path());
}

#[test]
fn test_empty_search_path_segments_are_ignored() {
    let temp = TempDir::new().unwrap();
    temp.child("proxy-server").touch().unwrap();

    let search = format!(":{}:", temp.path().display());
    let locator = BinaryLocator::new(search, ':', None);

    assert!(locator.resolve("proxy-server").is_ok());
}
