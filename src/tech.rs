// src/tech.rs
//! Technology detection from compose files, `go.mod`, Makefiles and imports.
//!
//! Detection is keyword based and never fails: unreadable files contribute
//! nothing.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::parse::{FileKind, ParsedFile};

/// Technology every analyzed tree has; it is never drawn as its own node.
pub const HOST_LANGUAGE: &str = "Go";

const COMPOSE_FILES: &[&str] = &[
    "docker-compose.yml",
    "docker-compose.yaml",
    "compose.yml",
    "compose.yaml",
];

/// Module path prefixes and the technology they imply.
const MODULE_TECH: &[(&str, &str)] = &[
    ("google.golang.org/grpc", "gRPC"),
    ("google.golang.org/protobuf", "Protocol Buffers"),
    ("github.com/gin-gonic/gin", "Gin"),
    ("github.com/labstack/echo", "Echo"),
    ("github.com/gofiber/fiber", "Fiber"),
    ("github.com/gorilla/mux", "Gorilla Mux"),
    ("github.com/go-chi/chi", "Chi"),
    ("gorm.io/gorm", "GORM"),
    ("gorm.io/driver/postgres", "PostgreSQL"),
    ("github.com/jmoiron/sqlx", "sqlx"),
    ("github.com/jackc/pgx", "PostgreSQL"),
    ("github.com/lib/pq", "PostgreSQL"),
    ("github.com/go-redis/redis", "Redis"),
    ("github.com/redis/go-redis", "Redis"),
    ("go.mongodb.org/mongo-driver", "MongoDB"),
    ("github.com/segmentio/kafka-go", "Kafka"),
    ("github.com/IBM/sarama", "Kafka"),
    ("github.com/Shopify/sarama", "Kafka"),
    ("github.com/nats-io/nats.go", "NATS"),
    ("github.com/streadway/amqp", "RabbitMQ"),
    ("github.com/rabbitmq/amqp091-go", "RabbitMQ"),
    ("go.uber.org/zap", "Zap Logger"),
    ("github.com/sirupsen/logrus", "Logrus"),
    ("log/slog", "slog"),
    ("go.opentelemetry.io/otel", "OpenTelemetry"),
    ("github.com/prometheus/client_golang", "Prometheus"),
    ("github.com/elastic/go-elasticsearch", "Elasticsearch"),
    ("github.com/ClickHouse/clickhouse-go", "ClickHouse"),
    ("github.com/minio/minio-go", "MinIO"),
    ("github.com/aws/aws-sdk-go", "AWS SDK"),
    ("cloud.google.com/go", "Google Cloud"),
    ("k8s.io/client-go", "Kubernetes Client"),
    ("github.com/hashicorp/consul", "Consul"),
    ("github.com/hashicorp/vault", "HashiCorp Vault"),
    ("go.etcd.io/etcd", "etcd"),
    ("github.com/golang-jwt/jwt", "JWT"),
    ("github.com/spf13/cobra", "Cobra CLI"),
    ("github.com/spf13/viper", "Viper Config"),
    ("github.com/grpc-ecosystem/grpc-gateway", "gRPC Gateway"),
    ("github.com/99designs/gqlgen", "gqlgen (GraphQL)"),
    ("github.com/golang-migrate/migrate", "DB Migrations"),
    ("github.com/pressly/goose", "Goose Migrations"),
    ("github.com/swaggo/swag", "Swagger"),
    ("github.com/stretchr/testify", "Testify"),
    ("github.com/docker/docker", "Docker SDK"),
];

/// Container image name fragments, checked in order.
const IMAGE_TECH: &[(&str, &str)] = &[
    ("postgres", "PostgreSQL"),
    ("mysql", "MySQL"),
    ("mariadb", "MariaDB"),
    ("mongo", "MongoDB"),
    ("redis", "Redis"),
    ("memcached", "Memcached"),
    ("rabbitmq", "RabbitMQ"),
    ("kafka", "Kafka"),
    ("zookeeper", "Zookeeper"),
    ("elasticsearch", "Elasticsearch"),
    ("opensearch", "OpenSearch"),
    ("kibana", "Kibana"),
    ("grafana", "Grafana"),
    ("prometheus", "Prometheus"),
    ("jaeger", "Jaeger"),
    ("nginx", "NGINX"),
    ("envoy", "Envoy"),
    ("consul", "Consul"),
    ("vault", "HashiCorp Vault"),
    ("nats", "NATS"),
    ("etcd", "etcd"),
    ("minio", "MinIO"),
    ("clickhouse", "ClickHouse"),
    ("influxdb", "InfluxDB"),
    ("temporal", "Temporal"),
    ("keycloak", "Keycloak"),
    ("traefik", "Traefik"),
    ("caddy", "Caddy"),
    ("localstack", "LocalStack"),
    ("cassandra", "Cassandra"),
];

/// Keywords (upper-cased line) or default ports seen in compose service bodies.
const COMPOSE_HINTS: &[(&[&str], &str, &str)] = &[
    (&["POSTGRES", "PGHOST"], "5432", "PostgreSQL"),
    (&["REDIS"], "6379", "Redis"),
    (&["MONGO"], "27017", "MongoDB"),
    (&["KAFKA"], "9092", "Kafka"),
    (&["RABBIT"], "5672", "RabbitMQ"),
];

const MAKEFILE_HINTS: &[(&str, &str)] = &[
    ("protoc", "Protocol Buffers"),
    ("grpc", "gRPC"),
    ("postgres", "PostgreSQL"),
    ("psql", "PostgreSQL"),
    ("redis-cli", "Redis"),
    ("mongo", "MongoDB"),
    ("kafka", "Kafka"),
    ("rabbitmq", "RabbitMQ"),
    ("nats", "NATS"),
    ("docker", "Docker"),
    ("kubectl", "Kubernetes"),
    ("helm", "Helm"),
    ("swagger", "Swagger"),
    ("migrate", "DB Migrations"),
];

static COMPOSE_KEY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^([ \t]*)([A-Za-z0-9_.\-]+):\s*$"));
static COMPOSE_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"^\s*image:\s*["']?([^"'\s]+)"#));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("Invalid tech pattern {pattern}: {e}"))
}

/// Services and technologies found around the scanned root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechScan {
    /// Sorted compose service names.
    pub docker_services: Vec<String>,
    /// Sorted technology names.
    pub technologies: Vec<String>,
}

/// Technology implied by a Go import path or module line.
#[must_use]
pub fn tech_from_import(import: &str) -> Option<&'static str> {
    MODULE_TECH
        .iter()
        .find(|(prefix, _)| import.starts_with(prefix))
        .map(|(_, tech)| *tech)
}

/// Technology implied by a container image reference.
#[must_use]
pub fn tech_from_image(image: &str) -> Option<&'static str> {
    let image = image.to_ascii_lowercase();
    IMAGE_TECH
        .iter()
        .find(|(key, _)| image.contains(key))
        .map(|(_, tech)| *tech)
}

/// Width of leading whitespace; a tab counts as two columns.
fn indent_width(prefix: &str) -> usize {
    prefix.chars().map(|c| if c == '\t' { 2 } else { 1 }).sum()
}

/// Extracts service names and technologies from a compose document.
#[must_use]
pub fn parse_compose(content: &str) -> (Vec<String>, BTreeSet<String>) {
    let mut services = Vec::new();
    let mut techs = BTreeSet::new();
    let mut base: Option<usize> = None;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let key = COMPOSE_KEY.captures(line);
        if trimmed == "services:" {
            base = key.map(|c| indent_width(&c[1]));
            continue;
        }
        let Some(indent) = base else {
            continue;
        };
        if let Some(c) = &key {
            let width = indent_width(&c[1]);
            if width <= indent {
                base = None;
                continue;
            }
            if width == indent + 2 {
                services.push(c[2].to_string());
            }
        }

        if let Some(c) = COMPOSE_IMAGE.captures(trimmed) {
            if let Some(tech) = tech_from_image(&c[1]) {
                techs.insert(tech.to_string());
            }
        }
        let upper = trimmed.to_ascii_uppercase();
        for (keywords, port, tech) in COMPOSE_HINTS {
            if keywords.iter().any(|k| upper.contains(k)) || trimmed.contains(port) {
                techs.insert((*tech).to_string());
            }
        }
    }
    (services, techs)
}

/// Technologies named by the requirements of a `go.mod`.
#[must_use]
pub fn scan_go_mod(content: &str) -> BTreeSet<String> {
    content
        .lines()
        .map(|l| {
            let l = l.trim();
            l.strip_prefix("require ").map_or(l, str::trim_start)
        })
        .filter_map(tech_from_import)
        .map(str::to_string)
        .collect()
}

/// Technologies hinted at by Makefile recipes.
#[must_use]
pub fn scan_makefile(content: &str) -> BTreeSet<String> {
    let lower = content.to_ascii_lowercase();
    MAKEFILE_HINTS
        .iter()
        .filter(|(keyword, _)| lower.contains(keyword))
        .map(|(_, tech)| (*tech).to_string())
        .collect()
}

fn read(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

/// Scans `root` and its visible first-level directories.
#[must_use]
pub fn scan_tree(root: &Path) -> TechScan {
    let mut dirs: Vec<PathBuf> = vec![root.to_path_buf()];
    if let Ok(entries) = fs::read_dir(root) {
        let mut children: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
            .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
            .map(|e| e.path())
            .collect();
        children.sort();
        dirs.extend(children);
    }

    let mut services = BTreeSet::new();
    let mut techs = BTreeSet::new();
    for dir in &dirs {
        for name in COMPOSE_FILES {
            if let Some(content) = read(&dir.join(name)) {
                debug!("Reading {}", dir.join(name).display());
                let (svcs, found) = parse_compose(&content);
                services.extend(svcs);
                techs.extend(found);
            }
        }
        if let Some(content) = read(&dir.join("go.mod")) {
            techs.extend(scan_go_mod(&content));
        }
        if let Some(content) = read(&dir.join("Makefile")) {
            techs.extend(scan_makefile(&content));
        }
    }

    TechScan {
        docker_services: services.into_iter().collect(),
        technologies: techs.into_iter().collect(),
    }
}

/// Technologies used by one set of files: import-derived plus proto tooling.
#[must_use]
pub fn file_technologies<'a>(files: impl IntoIterator<Item = &'a ParsedFile>) -> BTreeSet<String> {
    let mut techs = BTreeSet::new();
    for file in files {
        for import in &file.imports {
            if let Some(tech) = tech_from_import(import) {
                techs.insert(tech.to_string());
            }
        }
        if file.kind == FileKind::Proto {
            techs.insert("gRPC".to_string());
            techs.insert("Protocol Buffers".to_string());
        }
    }
    techs
}

/// The repository-wide technology list, sorted.
#[must_use]
pub fn technology_list(scan: &TechScan, files: &[ParsedFile]) -> Vec<String> {
    let mut techs: BTreeSet<String> = scan.technologies.iter().cloned().collect();
    techs.insert(HOST_LANGUAGE.to_string());
    techs.extend(file_technologies(files));
    techs.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPOSE: &str = r#"version: "3.8"
services:
  orders:
    build: ./services/orders
    environment:
      - PGHOST=db
  db:
    image: "postgres:16-alpine"
  cache:
    image: redis:7
volumes:
  data:
"#;

    #[test]
    fn compose_services_and_images() {
        let (services, techs) = parse_compose(COMPOSE);
        assert_eq!(services, vec!["orders", "db", "cache"]);
        assert!(techs.contains("PostgreSQL"));
        assert!(techs.contains("Redis"));
        assert_eq!(techs.len(), 2);
    }

    #[test]
    fn go_mod_requirements() {
        let techs = scan_go_mod(
            "module x\n\nrequire github.com/lib/pq v1.10.9\nrequire (\n\tgoogle.golang.org/grpc v1.60.0\n\tgithub.com/unknown/thing v0.1.0\n)\n",
        );
        let names: Vec<_> = techs.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["PostgreSQL", "gRPC"]);
    }

    #[test]
    fn makefile_keywords() {
        let techs = scan_makefile("gen:\n\tprotoc --go_out=. api.proto\nup:\n\tdocker compose up\n");
        assert!(techs.contains("Protocol Buffers"));
        assert!(techs.contains("Docker"));
        assert!(!techs.contains("Kafka"));
    }

    #[test]
    fn imports_and_proto_files() {
        let mut go = ParsedFile::new("a/main.go", "a", FileKind::Go);
        go.imports = vec!["github.com/gin-gonic/gin".into(), "fmt".into()];
        let proto = ParsedFile::new("a/api.proto", "a", FileKind::Proto);
        let techs = file_technologies([&go, &proto]);
        let names: Vec<_> = techs.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["Gin", "Protocol Buffers", "gRPC"]);
    }

    #[test]
    fn list_always_has_host_language() {
        let list = technology_list(&TechScan::default(), &[]);
        assert_eq!(list, vec![HOST_LANGUAGE]);
    }

    #[test]
    fn scan_reads_root_and_children() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("orders"))?;
        fs::write(dir.path().join("docker-compose.yml"), COMPOSE)?;
        fs::write(dir.path().join("orders/go.mod"), "module o\nrequire github.com/segmentio/kafka-go v0.4.0\n")?;
        let scan = scan_tree(dir.path());
        assert_eq!(scan.docker_services, vec!["cache", "db", "orders"]);
        assert_eq!(scan.technologies, vec!["Kafka", "PostgreSQL", "Redis"]);
        Ok(())
    }
}
