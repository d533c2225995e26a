//! End-to-end tests for the `modelsql` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const LIBRARY: &str = r#"from django.db import models


class Author(models.Model):
    name = models.CharField(max_length=100)
    email = models.EmailField(unique=True, null=True)


class Tag(models.Model):
    label = models.SlugField(unique=True)


class Book(models.Model):
    """A published book."""

    title = models.CharField(max_length=200)
    author = models.ForeignKey(Author, on_delete=models.CASCADE)
    tags = models.ManyToManyField(Tag)

    class Meta:
        ordering = ["title"]

    def __str__(self):
        return self.title
"#;

const VIEWS: &str = "\
def recent(request):
    books = Book.objects.filter(published=True)
    return render(request, \"books.html\", {\"books\": books})
";

fn modelsql() -> Command {
    let mut cmd = Command::cargo_bin("modelsql").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn library(dir: &Path) {
    fs::create_dir_all(dir.join("library")).unwrap();
    fs::write(dir.join("library/models.py"), LIBRARY).unwrap();
    fs::write(dir.join("library/views.py"), VIEWS).unwrap();
}

fn migrations(out: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = fs::read_dir(out.join("migrations"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    paths.sort();
    paths
}

#[test]
fn generates_every_artifact() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    library(input.path());

    modelsql()
        .arg("--input")
        .arg(input.path())
        .arg("--output")
        .arg(output.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("SQL Generation Complete"));

    let schema = fs::read_to_string(output.path().join("schema.sql")).unwrap();
    assert!(schema.contains(
        "CREATE TABLE book (\n    \
             id SERIAL PRIMARY KEY,\n    \
             title TEXT NOT NULL,\n    \
             author_id INTEGER NOT NULL,\n    \
             FOREIGN KEY (author_id) REFERENCES author(id)\n\
         );\n"
    ));
    assert!(schema.contains(
        "CREATE TABLE book_tags (\n    \
             book_id INTEGER REFERENCES book(id),\n    \
             tag_id INTEGER REFERENCES tag(id)\n\
         );\n"
    ));
    assert!(schema.contains("    email TEXT UNIQUE\n"));

    let pair = migrations(output.path());
    assert_eq!(pair.len(), 2);
    let down_name = pair[0].file_name().unwrap().to_string_lossy().into_owned();
    let up_name = pair[1].file_name().unwrap().to_string_lossy().into_owned();
    assert!(down_name.ends_with("_create_tables.down.sql"));
    assert!(up_name.ends_with("_create_tables.up.sql"));
    assert_eq!(down_name[..14], up_name[..14]);

    assert_eq!(fs::read_to_string(&pair[1]).unwrap(), schema);
    let down = fs::read_to_string(&pair[0]).unwrap();
    assert!(down.find("DROP TABLE IF EXISTS book_tags;").unwrap() < down.find("DROP TABLE IF EXISTS book;").unwrap());

    assert_eq!(
        fs::read_to_string(output.path().join("query.sql")).unwrap(),
        "-- from: library/views.py\n-- books = Book.objects.filter(published=True)"
    );
    assert!(
        fs::read_to_string(output.path().join("sqlc.yaml"))
            .unwrap()
            .contains("  - engine: postgresql\n")
    );
}

#[test]
fn mysql_dialect_sets_engine() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    library(input.path());

    modelsql()
        .args(["-d", "mysql", "-q"])
        .arg("-i")
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .success();

    let yaml = fs::read_to_string(output.path().join("sqlc.yaml")).unwrap();
    assert!(yaml.contains("  - engine: mysql\n"));
}

#[test]
fn broken_file_is_reported_and_skipped() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    library(input.path());
    fs::write(input.path().join("broken.py"), "class Broken(models.Model)\n    x = models.CharField()\n").unwrap();

    modelsql()
        .arg("-i")
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("broken.py:1:"));

    let schema = fs::read_to_string(output.path().join("schema.sql")).unwrap();
    assert!(schema.contains("CREATE TABLE book ("));
    assert!(!schema.contains("CREATE TABLE broken"));
}

#[test]
fn missing_input_fails_without_output() {
    let output = TempDir::new().unwrap();
    let missing = output.path().join("does-not-exist");

    modelsql()
        .arg("-i")
        .arg(&missing)
        .arg("-o")
        .arg(output.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input directory not found"));

    assert!(!output.path().join("out").exists());
}

#[test]
fn unknown_dialect_is_rejected() {
    modelsql()
        .args(["-i", ".", "-d", "oracle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("oracle"));
}

#[test]
fn undeclared_relation_targets_still_generate() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::write(
        input.path().join("models.py"),
        "class Book(models.Model):\n    author = models.ForeignKey(\"Writer\")\n",
    )
    .unwrap();

    modelsql()
        .arg("-i")
        .arg(input.path())
        .arg("-o")
        .arg(output.path().join("strict"))
        .arg("--strict-relations")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Writer"));
    assert!(!output.path().join("strict").exists());

    modelsql()
        .arg("-i")
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Book.author -> Writer"));
    let schema = fs::read_to_string(output.path().join("schema.sql")).unwrap();
    assert!(schema.contains("FOREIGN KEY (author_id) REFERENCES writer(id)"));
}

#[test]
fn dry_run_json_dumps_models() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    library(input.path());

    let assert = modelsql()
        .arg("-i")
        .arg(input.path())
        .arg("-o")
        .arg(output.path().join("out"))
        .args(["--dry-run", "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let names: Vec<&str> = json["models"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Author", "Tag", "Book"]);
    assert_eq!(json["queries"].as_array().unwrap().len(), 1);
    assert!(!output.path().join("out").exists());
}

#[test]
fn config_file_supplies_settings() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    library(input.path());

    let config = output.path().join("modelsql.toml");
    fs::write(
        &config,
        format!(
            "input = {:?}\noutput = {:?}\ndialect = \"mysql\"\n",
            input.path().display().to_string(),
            output.path().join("gen").display().to_string()
        ),
    )
    .unwrap();

    modelsql().arg("--config").arg(&config).arg("-q").assert().success();

    let yaml = fs::read_to_string(output.path().join("gen/sqlc.yaml")).unwrap();
    assert!(yaml.contains("engine: mysql"));
}
