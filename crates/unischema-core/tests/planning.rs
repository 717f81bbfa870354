//! End-to-end planning tests: dialect values in, ordered changes out.

use unischema_core::change::{DropConstraintChange, DropTableChange};
use unischema_core::dialect::mysql::{MyColumn, MyForeignKey, MyTable};
use unischema_core::dialect::postgres::{self, PgColumn, PgForeignKey, PgTable};
use unischema_core::dialect::sqlite::{self, SqliteColumn, SqliteDatabase, SqliteTable};
use unischema_core::model::{
    ColumnDef, DataType, Database, QualifiedName, ReferenceConstraint, Table, TableConstraint,
    TableConstraintSpec,
};
use unischema_core::{ChangeKind, SchemaChange, ToCanonical, diff, plan};

fn simple_table(name: &str, columns: &[&str]) -> Table {
    columns.iter().fold(Table::new(QualifiedName::simple(name)), |t, c| {
        t.with_column(ColumnDef::new(*c, DataType::Integer))
    })
}

#[test]
fn scenario_add_column() {
    let current = Database::new("app").with_table(simple_table("users", &["id"]));
    let desired = Database::new("app").with_table(simple_table("users", &["id", "email"]));

    let result = plan(&current, &desired);
    assert_eq!(result.len(), 1);
    match &result.changes[0] {
        SchemaChange::AddColumn(add) => {
            assert_eq!(add.table.simple_name(), "users");
            assert_eq!(add.column.name, "email");
        }
        other => panic!("expected AddColumn, got {other:?}"),
    }
}

#[test]
fn scenario_drop_table_with_foreign_key() {
    let orders = simple_table("orders", &["id", "user_id"]).with_constraint(TableConstraint::named(
        "fk_user",
        TableConstraintSpec::Reference(ReferenceConstraint::new(
            vec!["user_id".into()],
            QualifiedName::simple("users"),
            vec!["id".into()],
        )),
    ));
    let current = Database::new("app").with_table(orders);
    let desired = Database::new("app");

    let result = plan(&current, &desired);
    assert_eq!(
        result.into_changes(),
        vec![
            SchemaChange::DropConstraint(DropConstraintChange {
                table: QualifiedName::simple("orders"),
                name: "fk_user".into(),
                is_foreign_key: true,
            }),
            SchemaChange::DropTable(DropTableChange {
                table: QualifiedName::simple("orders"),
            }),
        ]
    );
}

#[test]
fn scenario_add_table_only() {
    let desired = Database::new("app").with_table(simple_table("accounts", &["id", "owner"]));
    let result = plan(&Database::new("app"), &desired);
    let kinds: Vec<ChangeKind> = result.iter().map(SchemaChange::kind).collect();
    assert_eq!(kinds, [ChangeKind::AddTable]);
}

#[test]
fn postgres_snapshot_against_itself_is_empty() {
    let mut id = PgColumn::new("id", postgres::map_type("int8"));
    id.ordinal_position = 1;
    id.is_nullable = false;
    id.is_primary_key = true;
    let mut org = PgColumn::new("org_id", postgres::map_type("int8"));
    org.ordinal_position = 2;

    let mut users = PgTable::new(QualifiedName::new(["public", "users"]).unwrap());
    users.columns = vec![org, id];
    users.foreign_keys.push(PgForeignKey {
        name: "fk_org".into(),
        local_columns: vec!["org_id".into()],
        foreign_table: QualifiedName::new(["public", "orgs"]).unwrap(),
        foreign_columns: vec!["id".into()],
        on_update: "NO ACTION".into(),
        on_delete: "CASCADE".into(),
        match_option: "SIMPLE".into(),
    });

    let table = users.to_canonical().unwrap();
    let db = Database::new("pg").with_table(table);
    assert!(diff(&db, &db.clone()).is_empty());
}

#[test]
fn mysql_live_vs_desired_plan() {
    let mut live = MyTable::new(QualifiedName::new(["shop", "orders"]).unwrap());
    live.engine = "InnoDB".into();
    live.columns = vec![
        MyColumn::new("id", DataType::Integer),
        MyColumn::new("note", DataType::Text),
    ];
    live.foreign_keys.push(MyForeignKey {
        name: "fk_customer".into(),
        local_columns: vec!["customer_id".into()],
        foreign_table: QualifiedName::new(["shop", "customers"]).unwrap(),
        foreign_columns: vec!["id".into()],
        on_update: "RESTRICT".into(),
        on_delete: "CASCADE".into(),
    });

    let mut wanted = live.clone();
    wanted.engine = "MyISAM".into();
    wanted.columns = vec![
        MyColumn::new("id", DataType::BigInteger),
        MyColumn::new("total", DataType::Decimal {
            precision: 10,
            scale: 2,
        }),
    ];
    wanted.foreign_keys.clear();

    let current = Database::new("shop").with_table(live.to_canonical().unwrap());
    let desired = Database::new("shop").with_table(wanted.to_canonical().unwrap());
    let result = plan(&current, &desired);

    let summary: Vec<(ChangeKind, u8, bool)> = result
        .iter()
        .map(|c| (c.kind(), c.priority(), c.is_destructive()))
        .collect();
    assert_eq!(
        summary,
        [
            (ChangeKind::DropConstraint, 5, false),
            (ChangeKind::DropColumn, 20, true),
            (ChangeKind::AddColumn, 50, false),
            (ChangeKind::AlterTableOptions, 70, false),
            (ChangeKind::AlterColumn, 70, true),
        ]
    );
}

#[test]
fn sqlite_database_conversion_feeds_the_planner() {
    let mut id = SqliteColumn::new("id", sqlite::map_type("INTEGER"));
    id.is_primary_key = true;
    let mut notes = SqliteTable::new("notes");
    notes.columns = vec![id, SqliteColumn::new("body", sqlite::map_type("TEXT"))];
    let live = SqliteDatabase {
        name: "main".into(),
        tables: vec![notes],
    }
    .to_canonical()
    .unwrap();

    let desired = Database::new("main");
    let result = plan(&live, &desired);
    let kinds: Vec<ChangeKind> = result.iter().map(SchemaChange::kind).collect();
    assert_eq!(kinds, [ChangeKind::DropTable]);
}

#[test]
fn snapshot_survives_json() {
    let db = Database::new("app").with_table(
        simple_table("users", &["id"]).with_constraint(TableConstraint::named(
            "ck_id",
            TableConstraintSpec::Check(unischema_core::model::Expr::literal("id > 0")),
        )),
    );
    let json = serde_json::to_string(&db).unwrap();
    let back: Database = serde_json::from_str(&json).unwrap();
    assert_eq!(back, db);
    assert!(diff(&db, &back).is_empty());
}
