use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use probe_core::Category;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("no fixture template for category {0}")]
    Unsupported(Category),
    #[error("fixture directory not usable: {0}")]
    Dir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// A synthetic project written to disk for parser probes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub category: Category,
    pub root: PathBuf,
    pub manifest: PathBuf,
    pub expected_dependencies: Vec<&'static str>,
}

struct Template {
    manifest: &'static str,
    content: &'static str,
    dependencies: &'static [&'static str],
}

const PYTHON: Template = Template {
    manifest: "requirements.txt",
    content: "requests==2.28.0\nflask==2.0.1\nnumpy==1.23.0\npandas==1.4.2\nsqlalchemy==1.4.39\n",
    dependencies: &["requests", "flask", "numpy", "pandas", "sqlalchemy"],
};

const JAVA: Template = Template {
    manifest: "pom.xml",
    content: r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <modelVersion>4.0.0</modelVersion>
    <groupId>com.test</groupId>
    <artifactId>test-project</artifactId>
    <version>1.0.0</version>

    <dependencies>
        <dependency>
            <groupId>org.springframework.boot</groupId>
            <artifactId>spring-boot-starter-web</artifactId>
            <version>2.7.0</version>
        </dependency>
        <dependency>
            <groupId>mysql</groupId>
            <artifactId>mysql-connector-java</artifactId>
            <version>8.0.28</version>
        </dependency>
        <dependency>
            <groupId>org.projectlombok</groupId>
            <artifactId>lombok</artifactId>
            <version>1.18.24</version>
        </dependency>
    </dependencies>
</project>
"#,
    dependencies: &["spring-boot-starter-web", "mysql-connector-java", "lombok"],
};

const JAVASCRIPT: Template = Template {
    manifest: "package.json",
    content: r#"{
  "name": "test-project",
  "version": "1.0.0",
  "dependencies": {
    "express": "^4.18.0",
    "axios": "^1.4.0",
    "lodash": "^4.17.21",
    "moment": "^2.29.4",
    "mysql2": "^3.3.0"
  }
}
"#,
    dependencies: &["express", "axios", "lodash", "moment", "mysql2"],
};

const GO: Template = Template {
    manifest: "go.mod",
    content: "module example.com/test-project\n\ngo 1.20\n\nrequire (\n    github.com/gin-gonic/gin v1.9.0\n    github.com/go-sql-driver/mysql v1.7.0\n    gorm.io/gorm v1.25.0\n)\n",
    dependencies: &[
        "github.com/gin-gonic/gin",
        "github.com/go-sql-driver/mysql",
        "gorm.io/gorm",
    ],
};

const RUST: Template = Template {
    manifest: "Cargo.toml",
    content: "[package]\nname = \"test-project\"\nversion = \"1.0.0\"\nedition = \"2021\"\n\n[dependencies]\nserde = \"1\"\ntokio = \"1\"\nreqwest = \"0.12\"\n",
    dependencies: &["serde", "tokio", "reqwest"],
};

const PHP: Template = Template {
    manifest: "composer.json",
    content: r#"{
  "name": "test/test-project",
  "require": {
    "monolog/monolog": "^3.0",
    "guzzlehttp/guzzle": "^7.5"
  }
}
"#,
    dependencies: &["monolog/monolog", "guzzlehttp/guzzle"],
};

const RUBY: Template = Template {
    manifest: "Gemfile",
    content: "source 'https://rubygems.org'\n\ngem 'rails', '~> 7.0'\ngem 'puma', '~> 6.0'\ngem 'pg', '~> 1.4'\n",
    dependencies: &["rails", "puma", "pg"],
};

const ERLANG: Template = Template {
    manifest: "rebar.config",
    content: "{deps, [\n    {cowboy, \"2.10.0\"},\n    {jsx, \"3.1.0\"}\n]}.\n",
    dependencies: &["cowboy", "jsx"],
};

fn template_for(category: &Category) -> Option<&'static Template> {
    match category.as_str() {
        "python" => Some(&PYTHON),
        "java" => Some(&JAVA),
        "javascript" => Some(&JAVASCRIPT),
        "go" => Some(&GO),
        "rust" => Some(&RUST),
        "php" => Some(&PHP),
        "ruby" => Some(&RUBY),
        "erlang" => Some(&ERLANG),
        _ => None,
    }
}

/// Write a one-manifest project for `category` under `dir/probe-fixture-<category>`.
pub fn write_fixture(dir: &Path, category: &Category) -> Result<Fixture, FixtureError> {
    let template = template_for(category).ok_or_else(|| FixtureError::Unsupported(category.clone()))?;

    let root = dir.join(format!("probe-fixture-{category}"));
    ensure_dir(&root)?;
    let manifest = write_atomic(&root, template.manifest, template.content)?;

    Ok(Fixture {
        category: category.clone(),
        root,
        manifest,
        expected_dependencies: template.dependencies.to_vec(),
    })
}

fn ensure_dir(dir: &Path) -> Result<(), FixtureError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| FixtureError::Dir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(FixtureError::Dir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| FixtureError::Dir(e.to_string()))?;
    }
    Ok(())
}

fn write_atomic(dir: &Path, filename: &str, content: &str) -> Result<PathBuf, FixtureError> {
    let target = dir.join(filename);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;

    if target.exists() {
        fs::remove_file(&target)?;
    }
    tmp.persist(&target).map_err(|e| FixtureError::Io(e.error))?;
    Ok(target)
}
