#![cfg(test)]
#![expect(clippy::panic_in_result_fn)]

use anyhow::Result;
use assert_cmd::Command;
use assert_fs::NamedTempFile;
use assert_fs::prelude::*;
use predicates::prelude::*;

const PIZZA: &str = r#"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix pizza: <http://example.com/pizza#> .

pizza:Pizza a owl:Class ; rdfs:label "Pizza"@en .
pizza:NamedPizza a owl:Class ; rdfs:subClassOf pizza:Pizza .
pizza:Topping a owl:Class .
pizza:hasTopping a owl:ObjectProperty ; rdfs:domain pizza:Pizza ; rdfs:range pizza:Topping .
"#;

fn cli_command() -> Result<Command> {
    Ok(Command::cargo_bin("ontoscan")?)
}

fn pizza_file() -> Result<NamedTempFile> {
    let file = NamedTempFile::new("pizza.ttl")?;
    file.write_str(PIZZA)?;
    Ok(file)
}

#[test]
fn cli_help() -> Result<()> {
    cli_command()?
        .assert()
        .failure()
        .stderr(predicate::str::contains("ontoscan"));
    Ok(())
}

#[test]
fn cli_summary() -> Result<()> {
    let file = pizza_file()?;
    cli_command()?
        .arg("summary")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Classes: 3"))
        .stdout(predicate::str::contains(
            "Properties: 1 (annotation: 0, object: 1, datatype: 0)",
        ))
        .stdout(predicate::str::contains("Top layer: pizza:Pizza, pizza:Topping"));
    Ok(())
}

#[test]
fn cli_summary_json() -> Result<()> {
    let file = pizza_file()?;
    let output = cli_command()?
        .arg("summary")
        .arg("--json")
        .arg(file.path())
        .output()?;
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(summary["classes"], 3);
    assert_eq!(summary["properties"]["object"], 1);
    assert_eq!(
        summary["top_layer"],
        serde_json::json!(["pizza:Pizza", "pizza:Topping"])
    );
    Ok(())
}

#[test]
fn cli_tree() -> Result<()> {
    let file = pizza_file()?;
    cli_command()?
        .arg("tree")
        .arg("--no-ids")
        .arg(file.path())
        .assert()
        .success()
        .stdout("pizza:Pizza\n----pizza:NamedPizza\npizza:Topping\n");
    Ok(())
}

#[test]
fn cli_find_fragment() -> Result<()> {
    let file = pizza_file()?;
    cli_command()?
        .arg("find")
        .arg("izza")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[1] pizza:NamedPizza <http://example.com/pizza#NamedPizza>",
        ))
        .stdout(predicate::str::contains(
            "[2] pizza:Pizza <http://example.com/pizza#Pizza> \"Pizza\"",
        ))
        .stdout(predicate::str::contains("Topping").not());
    Ok(())
}

#[test]
fn cli_find_nothing() -> Result<()> {
    let file = pizza_file()?;
    cli_command()?
        .arg("find")
        .arg("--properties")
        .arg("cheese")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No property matches 'cheese'"));
    Ok(())
}

#[test]
fn cli_namespaces() -> Result<()> {
    let file = pizza_file()?;
    cli_command()?
        .arg("namespaces")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("pizza: <http://example.com/pizza#>"))
        .stdout(predicate::str::contains("owl: <http://www.w3.org/2002/07/owl#>"));
    Ok(())
}

#[test]
fn cli_dump() -> Result<()> {
    let file = pizza_file()?;
    let output = NamedTempFile::new("output.nt")?;
    cli_command()?
        .arg("dump")
        .arg(file.path())
        .arg("--to-file")
        .arg(output.path())
        .assert()
        .success();
    output.assert(predicate::str::contains(
        "<http://example.com/pizza#NamedPizza> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://example.com/pizza#Pizza> .",
    ));
    Ok(())
}

#[test]
fn cli_dump_requires_a_format_for_stdout() -> Result<()> {
    let file = pizza_file()?;
    cli_command()?
        .arg("dump")
        .arg(file.path())
        .assert()
        .failure();
    Ok(())
}

#[test]
fn cli_missing_file() -> Result<()> {
    cli_command()?
        .arg("summary")
        .arg("does/not/exist.ttl")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load does/not/exist.ttl"));
    Ok(())
}
