//! End-to-end pipeline tests: fixture source -> introspection -> relationship
//! resolution -> artifact generation, using the shipped template set.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use tablesmith::{
    Builder, ColumnRecord, GenerationError, Introspector, MemorySource, Schema, TeraRenderer,
    relations,
};

fn shipped_templates() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("templates")
}

/// The two-table shop fixture: `orders.user_id` references `users.id`.
fn users_orders_schema() -> Schema {
    let source = MemorySource::new()
        .table(
            "users",
            "CREATE TABLE `users` (\n\
             `id` int(10) unsigned NOT NULL AUTO_INCREMENT,\n\
             `name` varchar(255) NOT NULL,\n\
             PRIMARY KEY (`id`)\n\
             ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
            vec![
                ColumnRecord {
                    key: "PRI".to_string(),
                    extra: "auto_increment".to_string(),
                    ..ColumnRecord::simple("id", "int(10) unsigned")
                },
                ColumnRecord::simple("name", "varchar(255)"),
            ],
        )
        .table(
            "orders",
            "CREATE TABLE `orders` (\n\
             `id` int(10) unsigned NOT NULL AUTO_INCREMENT,\n\
             `user_id` int(10) unsigned NOT NULL,\n\
             PRIMARY KEY (`id`),\n\
             KEY `idx_orders_user` (`user_id`),\n\
             CONSTRAINT `fk_orders_user` FOREIGN KEY (`user_id`) REFERENCES `users` (`id`)\n\
             ) ENGINE=InnoDB",
            vec![
                ColumnRecord {
                    key: "PRI".to_string(),
                    extra: "auto_increment".to_string(),
                    ..ColumnRecord::simple("id", "int(10) unsigned")
                },
                ColumnRecord {
                    key: "MUL".to_string(),
                    ..ColumnRecord::simple("user_id", "int(10) unsigned")
                },
            ],
        );

    let mut schema = Introspector::new(source, "shop").introspect().unwrap();
    relations::resolve(&mut schema);
    schema
}

#[test]
fn test_referenced_table_gains_reverse_entry() {
    let schema = users_orders_schema();

    let users = &schema.tables["users"];
    assert_eq!(users.foreign_keys.len(), 1);
    let reverse = &users.foreign_keys[0];
    assert!(reverse.reverse);
    assert_eq!(reverse.referenced_table, "orders");
    assert_eq!(reverse.referenced_namespace, "Orders");
    assert_eq!(reverse.columns.len(), 1);
    assert_eq!(reverse.columns[0].local, "id");
    assert_eq!(reverse.columns[0].referenced, "user_id");

    let orders = &schema.tables["orders"];
    assert_eq!(orders.related_namespaces, vec!["Users"]);
    assert_eq!(orders.reference_columns, vec!["user_id"]);
}

#[test]
fn test_generation_writes_base_and_user_artifacts() {
    let out = TempDir::new().unwrap();
    let schema = users_orders_schema();
    let builder = Builder::new(TeraRenderer::new(), shipped_templates());

    let summary = builder.build(&schema, out.path()).unwrap();
    assert_eq!(summary.written.len(), 4);
    assert!(summary.skipped.is_empty());

    for artifact in ["BaseUsers", "Users", "BaseOrders", "Orders"] {
        assert!(out.path().join(artifact).is_file(), "missing {}", artifact);
    }

    let base_orders = fs::read_to_string(out.path().join("BaseOrders")).unwrap();
    assert!(base_orders.contains("pub struct OrdersRow"));
    assert!(base_orders.contains("pub user_id: i64,"));
    assert!(base_orders.contains("pub const TABLE: &'static str = \"orders\";"));
    assert!(base_orders.contains("// references Users via user_id -> id"));

    let base_users = fs::read_to_string(out.path().join("BaseUsers")).unwrap();
    assert!(base_users.contains("pub name: String,"));
    assert!(base_users.contains("// referenced by Orders (`orders`)"));
}

#[test]
fn test_second_run_rewrites_base_but_keeps_user_artifacts() {
    let out = TempDir::new().unwrap();
    let schema = users_orders_schema();
    let builder = Builder::new(TeraRenderer::new(), shipped_templates());

    builder.build(&schema, out.path()).unwrap();

    let users_artifact = out.path().join("Users");
    let orders_artifact = out.path().join("Orders");
    let base_users = out.path().join("BaseUsers");
    fs::write(&users_artifact, "my custom Users code").unwrap();
    fs::write(&orders_artifact, "my custom Orders code").unwrap();
    fs::write(&base_users, "stale base").unwrap();

    let summary = builder.build(&schema, out.path()).unwrap();
    assert_eq!(summary.written.len(), 2);
    assert_eq!(summary.skipped.len(), 2);

    assert_eq!(
        fs::read_to_string(&users_artifact).unwrap(),
        "my custom Users code"
    );
    assert_eq!(
        fs::read_to_string(&orders_artifact).unwrap(),
        "my custom Orders code"
    );
    let regenerated = fs::read_to_string(&base_users).unwrap();
    assert_ne!(regenerated, "stale base");
    assert!(regenerated.contains("generated by tablesmith"));
}

#[test]
fn test_dangling_reference_generates_without_reverse_entries() {
    let source = MemorySource::new().table(
        "posts",
        "CREATE TABLE `posts` (\n\
         `id` int NOT NULL,\n\
         `author_id` int NOT NULL,\n\
         PRIMARY KEY (`id`),\n\
         CONSTRAINT `fk_posts_author` FOREIGN KEY (`author_id`) REFERENCES `accounts` (`id`)\n\
         )",
        vec![
            ColumnRecord {
                key: "PRI".to_string(),
                ..ColumnRecord::simple("id", "int")
            },
            ColumnRecord::simple("author_id", "int"),
        ],
    );
    let mut schema = Introspector::new(source, "blog").introspect().unwrap();
    relations::resolve(&mut schema);

    let posts = &schema.tables["posts"];
    assert_eq!(posts.foreign_keys.len(), 1);
    assert!(!posts.foreign_keys[0].reverse);

    let out = TempDir::new().unwrap();
    let builder = Builder::new(TeraRenderer::new(), shipped_templates());
    let summary = builder.build(&schema, out.path()).unwrap();
    assert_eq!(summary.written.len(), 2);

    let base = fs::read_to_string(out.path().join("BasePosts")).unwrap();
    assert!(base.contains("// references Accounts via author_id -> id"));
}

#[test]
fn test_shipped_base_template_renders_classified_columns() {
    let source = MemorySource::new()
        .table(
            "products",
            "CREATE TABLE `products` (\n\
             `id` int(10) unsigned NOT NULL AUTO_INCREMENT,\n\
             `price` decimal(10,2) unsigned NOT NULL COMMENT 'unit price',\n\
             `description` text,\n\
             `stock` int(10) unsigned NOT NULL,\n\
             PRIMARY KEY (`id`)\n\
             ) ENGINE=InnoDB",
            vec![
                ColumnRecord {
                    key: "PRI".to_string(),
                    extra: "auto_increment".to_string(),
                    ..ColumnRecord::simple("id", "int(10) unsigned")
                },
                ColumnRecord {
                    comment: "unit price".to_string(),
                    ..ColumnRecord::simple("price", "decimal(10,2) unsigned")
                },
                ColumnRecord {
                    nullable: true,
                    ..ColumnRecord::simple("description", "text")
                },
                ColumnRecord::simple("stock", "int(10) unsigned"),
            ],
        )
        .table(
            "product_reviews",
            "CREATE TABLE `product_reviews` (\n\
             `id` int(10) unsigned NOT NULL AUTO_INCREMENT,\n\
             `product_id` int(10) unsigned NOT NULL,\n\
             `body` text NOT NULL,\n\
             PRIMARY KEY (`id`),\n\
             CONSTRAINT `fk_reviews_product` FOREIGN KEY (`product_id`) REFERENCES `products` (`id`)\n\
             ) ENGINE=InnoDB",
            vec![
                ColumnRecord {
                    key: "PRI".to_string(),
                    extra: "auto_increment".to_string(),
                    ..ColumnRecord::simple("id", "int(10) unsigned")
                },
                ColumnRecord {
                    key: "MUL".to_string(),
                    ..ColumnRecord::simple("product_id", "int(10) unsigned")
                },
                ColumnRecord::simple("body", "text"),
            ],
        );

    let mut schema = Introspector::new(source, "catalog").introspect().unwrap();
    relations::resolve(&mut schema);

    let out = TempDir::new().unwrap();
    let builder = Builder::new(TeraRenderer::new(), shipped_templates());
    builder.build(&schema, out.path()).unwrap();

    let base_products = fs::read_to_string(out.path().join("BaseProducts")).unwrap();
    assert!(base_products.contains("pub id: i64,"));
    assert!(base_products.contains("/// unit price"));
    assert!(base_products.contains("pub price: f64,"));
    assert!(base_products.contains("pub description: Option<String>,"));
    assert!(base_products.contains("pub stock: i64,"));
    assert!(base_products.contains("// referenced by ProductReviews (`product_reviews`)"));

    let base_reviews = fs::read_to_string(out.path().join("BaseProductReviews")).unwrap();
    assert!(base_reviews.contains("pub struct ProductReviewsRow"));
    assert!(base_reviews.contains("// references Products via product_id -> id"));
    assert!(base_reviews.contains(
        "pub const REFERENCE_COLUMNS: &'static [&'static str] = &[\"product_id\"];"
    ));

    let user_products = fs::read_to_string(out.path().join("Products")).unwrap();
    assert!(user_products.contains("impl ProductsRow"));
    assert!(user_products.contains("yours to edit"));
}

#[test]
fn test_exact_version_directory_supplies_missing_templates() {
    let templates = TempDir::new().unwrap();
    let family = templates.path().join("2");
    let exact = templates.path().join("2").join("2.00");
    fs::create_dir_all(&family).unwrap();
    fs::create_dir_all(&exact).unwrap();
    // The family template wins where both exist; the exact-version
    // directory only supplies what the family lacks.
    fs::write(family.join("base.tera"), "family base for {{ table_name }}\n").unwrap();
    fs::write(exact.join("base.tera"), "exact base for {{ table_name }}\n").unwrap();
    fs::write(exact.join("user.tera"), "exact user for {{ table_name }}\n").unwrap();

    let source = MemorySource::new().table(
        "widgets",
        "CREATE TABLE `widgets` (`id` int NOT NULL, PRIMARY KEY (`id`))",
        vec![ColumnRecord {
            key: "PRI".to_string(),
            ..ColumnRecord::simple("id", "int")
        }],
    );
    let mut schema = Introspector::new(source, "inventory").introspect().unwrap();
    relations::resolve(&mut schema);

    let out = TempDir::new().unwrap();
    let builder = Builder::new(TeraRenderer::new(), templates.path());
    builder.build(&schema, out.path()).unwrap();

    assert_eq!(
        fs::read_to_string(out.path().join("BaseWidgets")).unwrap(),
        "family base for widgets\n"
    );
    assert_eq!(
        fs::read_to_string(out.path().join("Widgets")).unwrap(),
        "exact user for widgets\n"
    );
}

#[test]
fn test_missing_output_directory_fails_before_writing() {
    let out = TempDir::new().unwrap();
    let missing = out.path().join("nope");
    let schema = users_orders_schema();
    let builder = Builder::new(TeraRenderer::new(), shipped_templates());

    let err = builder.build(&schema, &missing).unwrap_err();
    assert!(matches!(err, GenerationError::TargetNotWritable(_)));
    assert!(!missing.exists());
}
