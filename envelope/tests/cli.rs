// Copyright (c) 2024 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use std::{fs, path::Path, process::Command};

use assert_cmd::prelude::*;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

const MASTER_KEY: &[u8] = b"0123456789abcdefghijklmnopqrstuv";

/// A credential dir for the local key service plus a config selecting it.
fn setup() -> TempDir {
    let dir = tempdir().expect("create tempdir fail");
    let keys = json!({ "key-1": STANDARD.encode(MASTER_KEY) });
    fs::write(dir.path().join("master_keys.json"), keys.to_string()).unwrap();
    fs::write(
        dir.path().join("envelope.toml"),
        "provider = \"local\"\n\n[provider_settings]\nkey_id = \"key-1\"\n",
    )
    .unwrap();
    dir
}

fn envelope_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("envelope").unwrap();
    cmd.env("LOCAL_KMS_KEY_PATH", dir)
        .env_remove("ENVELOPE_CONFIG_PATH")
        .arg("--config")
        .arg(dir.join("envelope.toml"));
    cmd
}

fn seal(dir: &Path, plaintext_path: &Path, compact: bool) -> Vec<u8> {
    let mut cmd = envelope_cmd(dir);
    cmd.arg("seal").arg("--file-path").arg(plaintext_path);
    if compact {
        cmd.arg("--compact");
    }
    cmd.assert().success().get_output().stdout.clone()
}

#[test]
fn envelope_lifetime() {
    let dir = setup();
    let plaintext_path = dir.path().join("plaintext");
    fs::write(&plaintext_path, b"secret message").unwrap();

    let sealed = seal(dir.path(), &plaintext_path, false);
    let sealed_json: Value = serde_json::from_slice(&sealed).expect("sealed output is json");
    for field in ["key", "ciphertext", "salt"] {
        assert!(sealed_json[field].is_string(), "missing field {field}");
    }
    assert!(!String::from_utf8_lossy(&sealed).contains("secret message"));

    let sealed_path = dir.path().join("sealed.json");
    fs::write(&sealed_path, &sealed).unwrap();
    envelope_cmd(dir.path())
        .arg("open")
        .arg("--file-path")
        .arg(&sealed_path)
        .assert()
        .success();

    let opened = fs::read(dir.path().join("sealed.json.opened")).unwrap();
    assert_eq!(opened, b"secret message");

    // never overwrite an existing file
    envelope_cmd(dir.path())
        .arg("open")
        .arg("--file-path")
        .arg(&sealed_path)
        .assert()
        .failure();
}

#[test]
fn compact_envelope_lifetime() {
    let dir = setup();
    let plaintext_path = dir.path().join("plaintext");
    fs::write(&plaintext_path, b"secret message").unwrap();

    let sealed = seal(dir.path(), &plaintext_path, true);
    assert!(String::from_utf8_lossy(&sealed).starts_with("envelope."));

    let sealed_path = dir.path().join("sealed");
    fs::write(&sealed_path, &sealed).unwrap();
    let output_path = dir.path().join("opened");
    envelope_cmd(dir.path())
        .arg("open")
        .arg("--file-path")
        .arg(&sealed_path)
        .arg("--output")
        .arg(&output_path)
        .assert()
        .success();

    assert_eq!(fs::read(output_path).unwrap(), b"secret message");
}

#[test]
fn existing_output_is_kept() {
    let dir = setup();
    let plaintext_path = dir.path().join("plaintext");
    fs::write(&plaintext_path, b"secret message").unwrap();

    let sealed = seal(dir.path(), &plaintext_path, true);
    let sealed_path = dir.path().join("sealed");
    fs::write(&sealed_path, &sealed).unwrap();
    let output_path = dir.path().join("opened");
    fs::write(&output_path, b"keep me").unwrap();

    envelope_cmd(dir.path())
        .arg("open")
        .arg("--file-path")
        .arg(&sealed_path)
        .arg("--output")
        .arg(&output_path)
        .assert()
        .failure();

    assert_eq!(fs::read(output_path).unwrap(), b"keep me");
}

#[test]
fn tampered_envelope_is_refused() {
    let dir = setup();
    let plaintext_path = dir.path().join("plaintext");
    fs::write(&plaintext_path, b"secret message").unwrap();

    let sealed = seal(dir.path(), &plaintext_path, false);
    let mut sealed_json: Value = serde_json::from_slice(&sealed).unwrap();
    let mut ciphertext = STANDARD
        .decode(sealed_json["ciphertext"].as_str().unwrap())
        .unwrap();
    ciphertext[0] ^= 0x01;
    sealed_json["ciphertext"] = Value::String(STANDARD.encode(ciphertext));

    let sealed_path = dir.path().join("sealed.json");
    fs::write(&sealed_path, sealed_json.to_string()).unwrap();
    envelope_cmd(dir.path())
        .arg("open")
        .arg("--file-path")
        .arg(&sealed_path)
        .assert()
        .failure();

    assert!(!dir.path().join("sealed.json.opened").exists());
}
