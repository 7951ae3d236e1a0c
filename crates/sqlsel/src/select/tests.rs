//! Rendering, mutator and pruning tests for `Select`.

use super::*;
use crate::config::DialectKind;
use crate::dialect::InsertMode;
use crate::expr::expr;

fn mysql() -> Select {
    Select::with_config(&SelectConfig::new().with_dialect(DialectKind::MySql))
}

// ==================== basic rendering ====================

#[test]
fn test_empty_select_is_star() {
    assert_eq!(Select::new().assemble().unwrap(), "SELECT *");
}

#[test]
fn test_tableless_expression() {
    let mut s = Select::new();
    s.from("", [expr("NOW()")]).unwrap();
    assert_eq!(s.assemble().unwrap(), "SELECT NOW()");

    let mut s = Select::new();
    s.from(TableInput::none(), [ColumnInput::aliased("one", expr("1"))])
        .unwrap();
    assert_eq!(s.assemble().unwrap(), r#"SELECT 1 AS "one""#);
}

#[test]
fn test_from_basic() {
    let mut s = Select::new();
    s.from("orders", ["id", "total"]).unwrap();
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT "orders"."id", "orders"."total" FROM "orders""#
    );
}

#[test]
fn test_from_without_columns() {
    let mut s = Select::new();
    s.from("orders", NO_COLUMNS).unwrap();
    assert_eq!(s.assemble().unwrap(), r#"SELECT * FROM "orders""#);
}

#[test]
fn test_wildcard_with_correlation() {
    let mut s = Select::new();
    s.from("orders AS o", ["*"]).unwrap();
    assert_eq!(s.assemble().unwrap(), r#"SELECT "o".* FROM "orders" AS "o""#);
}

#[test]
fn test_schema_qualified_table() {
    let mut s = Select::new();
    s.from("sales.orders", ["id"]).unwrap();
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT "orders"."id" FROM "sales"."orders""#
    );

    let mut s = Select::new();
    s.from(TableInput::from("orders").schema("sales"), ["id"])
        .unwrap();
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT "orders"."id" FROM "sales"."orders""#
    );
}

#[test]
fn test_expression_table_gets_generic_correlation() {
    let mut s = Select::new();
    s.from(expr("generate_series(1, 3)"), NO_COLUMNS).unwrap();
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT * FROM generate_series(1, 3) AS "t""#
    );
    assert!(s.has_table("t"));
}

#[test]
fn test_assemble_is_idempotent() {
    let mut s = Select::new();
    s.from("orders AS o", ["id"])
        .unwrap()
        .join_left("customers AS c", "c.id = o.customer_id", ["name"])
        .unwrap()
        .and_where_value("o.total > ?", 100)
        .order(["o.id DESC"])
        .limit(10, 0);
    let first = s.assemble().unwrap();
    let second = s.assemble().unwrap();
    assert_eq!(first, second);
    assert_eq!(s.to_string(), first);
}

#[test]
fn test_mutation_between_renders_is_visible() {
    let mut s = Select::new();
    s.from("orders", ["id"]).unwrap();
    let before = s.assemble().unwrap();
    s.and_where("orders.total > 0");
    let after = s.assemble().unwrap();
    assert_ne!(before, after);
    assert!(after.ends_with("WHERE (orders.total > 0)"));
}

// ==================== correlation names ====================

#[test]
fn test_duplicate_table_gets_suffixed_correlation() {
    let mut s = Select::new();
    s.from("orders", ["id"])
        .unwrap()
        .join_inner("orders", "orders_2.parent_id = orders.id", ["id"])
        .unwrap()
        .join_inner("orders", "orders_3.parent_id = orders_2.id", NO_COLUMNS)
        .unwrap();

    let names: Vec<&str> = s.tables().iter().map(|t| t.correlation.as_str()).collect();
    assert_eq!(names, ["orders", "orders_2", "orders_3"]);
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT "orders"."id", "orders_2"."id" FROM "orders" INNER JOIN "orders" AS "orders_2" ON orders_2.parent_id = orders.id INNER JOIN "orders" AS "orders_3" ON orders_3.parent_id = orders_2.id"#
    );
}

#[test]
fn test_explicit_correlation_collision_is_rejected() {
    let mut s = Select::new();
    s.from("orders AS o", NO_COLUMNS).unwrap();
    let err = s
        .join("customers AS o", "o.id = o.customer_id", NO_COLUMNS)
        .unwrap_err();
    assert!(matches!(err, QbError::DuplicateCorrelation(ref c) if c == "o"));
    assert_eq!(s.tables().len(), 1);
}

#[test]
fn test_aliased_table_input() {
    let mut s = Select::new();
    s.from(TableInput::aliased("o", "orders"), ["id"]).unwrap();
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT "o"."id" FROM "orders" AS "o""#
    );
}

// ==================== column classification ====================

#[test]
fn test_qualified_column_with_alias() {
    let mut s = Select::new();
    s.from("orders AS o", ["o.total AS grand", "COUNT(o.id)"])
        .unwrap();

    let specs = s.column_specs();
    assert_eq!(specs[0].correlation.as_deref(), Some("o"));
    assert_eq!(specs[0].expr, ColumnExpr::Ident("total".into()));
    assert_eq!(specs[0].alias.as_deref(), Some("grand"));
    assert_eq!(specs[1].expr, ColumnExpr::Raw(Expr::new("COUNT(o.id)")));

    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT "o"."total" AS "grand", COUNT(o.id) FROM "orders" AS "o""#
    );
}

#[test]
fn test_alias_matching_column_is_omitted() {
    let mut s = Select::new();
    s.from("orders AS o", ["o.id AS id"]).unwrap();
    assert_eq!(s.assemble().unwrap(), r#"SELECT "o"."id" FROM "orders" AS "o""#);
}

#[test]
fn test_columns_against_first_table() {
    let mut s = Select::new();
    s.from("orders AS o", NO_COLUMNS)
        .unwrap()
        .join_inner("customers AS c", "c.id = o.customer_id", NO_COLUMNS)
        .unwrap()
        .columns(["id"], None)
        .unwrap()
        .columns(["name"], Some("c"))
        .unwrap();
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT "o"."id", "c"."name" FROM "orders" AS "o" INNER JOIN "customers" AS "c" ON c.id = o.customer_id"#
    );
}

#[test]
fn test_columns_with_unknown_correlation() {
    let mut s = Select::new();
    s.from("orders", NO_COLUMNS).unwrap();
    let err = s.columns(["id"], Some("nope")).unwrap_err();
    assert!(matches!(err, QbError::UnknownCorrelation(ref c) if c == "nope"));
}

#[test]
fn test_sparse_column_list() {
    let mut s = Select::new();
    s.from("orders", [None, Some("id"), Some("")]).unwrap();
    assert_eq!(s.column_specs().len(), 1);
}

#[test]
fn test_mixed_column_inputs() {
    let mut s = Select::new();
    s.from(
        "orders AS o",
        [
            ColumnInput::from("status"),
            ColumnInput::from("COUNT(*) AS n"),
            ColumnInput::aliased("latest", expr("MAX(o.created_at)")),
        ],
    )
    .unwrap();
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT "o"."status", COUNT(*) AS "n", MAX(o.created_at) AS "latest" FROM "orders" AS "o""#
    );
}

#[test]
fn test_nested_select_column() {
    let mut refunds = Select::new();
    refunds
        .from("refunds AS r", [expr("COUNT(*)")])
        .unwrap()
        .and_where("r.order_id = o.id");

    let mut s = Select::new();
    s.from("orders AS o", ["id"])
        .unwrap()
        .columns([ColumnInput::aliased("refund_count", refunds)], None)
        .unwrap();
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT "o"."id", (SELECT COUNT(*) FROM "refunds" AS "r" WHERE (r.order_id = o.id)) AS "refund_count" FROM "orders" AS "o""#
    );
}

#[test]
fn test_subquery_as_table() {
    let mut recent = Select::new();
    recent
        .from("orders", ["id"])
        .unwrap()
        .and_where("orders.created_at > NOW() - INTERVAL '1 day'");

    let mut s = Select::new();
    s.from(TableInput::aliased("recent", recent.clone()), ["id"])
        .unwrap();
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT "recent"."id" FROM (SELECT "orders"."id" FROM "orders" WHERE (orders.created_at > NOW() - INTERVAL '1 day')) AS "recent""#
    );

    let mut s = Select::new();
    s.from(recent, NO_COLUMNS).unwrap();
    assert!(s.has_table("t"));
}

// ==================== joins ====================

#[test]
fn test_inner_join_without_condition_becomes_cross() {
    let mut s = Select::new();
    s.from("orders", NO_COLUMNS)
        .unwrap()
        .join_inner("t", "", ["*"])
        .unwrap();
    assert_eq!(s.tables()[1].join_type, JoinType::Cross);
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT "t".* FROM "orders" CROSS JOIN "t""#
    );
}

#[test]
fn test_outer_join_requires_condition() {
    let mut s = Select::new();
    s.from("orders", NO_COLUMNS).unwrap();
    let err = s.join_left("refunds", "  ", NO_COLUMNS).unwrap_err();
    assert!(matches!(
        err,
        QbError::MissingJoinCondition { join: "LEFT JOIN", ref table } if table == "refunds"
    ));
}

#[test]
fn test_first_table_never_carries_a_join() {
    let mut s = Select::new();
    s.join_left("orders", "", ["id"]).unwrap();
    assert_eq!(s.tables()[0].join_type, JoinType::None);
    assert_eq!(s.assemble().unwrap(), r#"SELECT "orders"."id" FROM "orders""#);
}

#[test]
fn test_join_kinds() {
    let mut s = Select::new();
    s.from("a", NO_COLUMNS)
        .unwrap()
        .join_natural("b", NO_COLUMNS)
        .unwrap()
        .join_right("c", "c.id = a.c_id", NO_COLUMNS)
        .unwrap()
        .join_full("d", "d.id = a.d_id", NO_COLUMNS)
        .unwrap()
        .join_cross("e", NO_COLUMNS)
        .unwrap();
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT * FROM "a" NATURAL JOIN "b" RIGHT JOIN "c" ON c.id = a.c_id FULL JOIN "d" ON d.id = a.d_id CROSS JOIN "e""#
    );
}

#[test]
fn test_join_as_parses_kind() {
    let mut s = Select::new();
    s.from("orders AS o", NO_COLUMNS)
        .unwrap()
        .join_as("LEFT OUTER JOIN", "refunds AS r", "r.order_id = o.id", NO_COLUMNS)
        .unwrap()
        .join_as("inner", "customers AS c", "c.id = o.customer_id", NO_COLUMNS)
        .unwrap();
    assert_eq!(s.tables()[1].join_type, JoinType::Left);
    assert_eq!(s.tables()[2].join_type, JoinType::Inner);
}

#[test]
fn test_join_as_rejects_unknown_kind() {
    let mut s = Select::new();
    s.from("orders", NO_COLUMNS).unwrap();
    let err = s
        .join_as("sideways", "refunds", "refunds.order_id = orders.id", NO_COLUMNS)
        .unwrap_err();
    assert!(matches!(err, QbError::InvalidJoinType(ref k) if k == "sideways"));
    assert!(err.is_misuse());
}

#[test]
fn test_join_requires_table() {
    let mut s = Select::new();
    s.from("orders", NO_COLUMNS).unwrap();
    let err = s.join_left("", "a = b", NO_COLUMNS).unwrap_err();
    assert!(matches!(err, QbError::MissingJoinTarget(_)));
}

// ==================== where / group / having / order ====================

#[test]
fn test_where_connectors() {
    let mut s = Select::new();
    s.from("t", NO_COLUMNS)
        .unwrap()
        .and_where_value("a = ?", 1)
        .or_where_value("b = ?", 2);
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT * FROM "t" WHERE (a = 1) OR (b = 2)"#
    );
}

#[test]
fn test_where_values_are_quoted() {
    let mut s = Select::new();
    s.from("users", NO_COLUMNS)
        .unwrap()
        .and_where_value("name = ?", "O'Brien")
        .and_where_value("id IN (?)", vec![1, 2, 3])
        .and_where_typed("age >= ?", "18 years", ValueType::Int)
        .and_where("deleted_at IS NULL")
        .and_where("");
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT * FROM "users" WHERE (name = 'O''Brien') AND (id IN (1, 2, 3)) AND (age >= 18) AND (deleted_at IS NULL)"#
    );
}

#[test]
fn test_where_needs_from() {
    let mut s = Select::new();
    s.and_where("a = 1").group(["a"]).having("COUNT(*) > 1");
    assert_eq!(s.assemble().unwrap(), "SELECT *");
}

#[test]
fn test_group_and_having() {
    let mut s = Select::new();
    s.from("orders AS o", ["status", "COUNT(*) AS n"])
        .unwrap()
        .group(["o.status", "DATE(o.created_at)", ""])
        .having_value("COUNT(*) > ?", 5)
        .or_having("SUM(o.total) > 100");
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT "o"."status", COUNT(*) AS "n" FROM "orders" AS "o" GROUP BY "o"."status", DATE(o.created_at) HAVING (COUNT(*) > 5) OR (SUM(o.total) > 100)"#
    );
    match s.get_part(Part::Having) {
        PartValue::Having(entries) => {
            assert_eq!(entries, ["(COUNT(*) > 5)", "OR (SUM(o.total) > 100)"]);
        }
        other => panic!("unexpected part: {other:?}"),
    }
}

#[test]
fn test_order_terms() {
    let mut s = Select::new();
    s.from("orders AS o", NO_COLUMNS)
        .unwrap()
        .order(["o.created_at DESC", "name", "2 desc", "LOWER(o.email) ASC", ""])
        .order([expr("o.id IS NULL"), expr("")]);
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT * FROM "orders" AS "o" ORDER BY "o"."created_at" DESC, "name" ASC, 2 DESC, LOWER(o.email) ASC, o.id IS NULL"#
    );
}

// ==================== limit / flags ====================

#[test]
fn test_limit_and_offset() {
    let mut s = Select::new();
    s.from("t", NO_COLUMNS).unwrap().limit(10, 20);
    assert_eq!(s.assemble().unwrap(), r#"SELECT * FROM "t" LIMIT 10 OFFSET 20"#);

    let mut paged = Select::new();
    paged.from("t", NO_COLUMNS).unwrap().limit_page(3, 10);
    assert_eq!(paged.assemble().unwrap(), s.assemble().unwrap());
}

#[test]
fn test_limit_edge_cases() {
    let mut s = Select::new();
    s.from("t", NO_COLUMNS).unwrap();

    s.limit(10, 0);
    assert_eq!(s.assemble().unwrap(), r#"SELECT * FROM "t" LIMIT 10"#);

    s.limit(0, 20);
    assert_eq!(s.assemble().unwrap(), r#"SELECT * FROM "t" OFFSET 20"#);

    s.limit_page(0, 0);
    assert_eq!(s.assemble().unwrap(), r#"SELECT * FROM "t" LIMIT 1"#);
}

#[test]
fn test_distinct_and_for_update() {
    let mut s = Select::new();
    s.from("t", ["id"])
        .unwrap()
        .distinct(true)
        .for_update(true)
        .limit(1, 0);
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT DISTINCT "t"."id" FROM "t" LIMIT 1 FOR UPDATE"#
    );
    s.distinct(false).for_update(false);
    assert_eq!(s.assemble().unwrap(), r#"SELECT "t"."id" FROM "t" LIMIT 1"#);
}

#[test]
fn test_straight_join_depends_on_dialect() {
    let mut my = mysql();
    my.from("t", ["id"]).unwrap().use_straight_join(true).distinct(true);
    assert_eq!(
        my.assemble().unwrap(),
        "SELECT STRAIGHT_JOIN DISTINCT `t`.`id` FROM `t`"
    );

    let mut pg = Select::new();
    pg.from("t", ["id"]).unwrap().use_straight_join(true);
    assert_eq!(pg.assemble().unwrap(), r#"SELECT "t"."id" FROM "t""#);
}

#[test]
fn test_mysql_offset_only() {
    let mut s = mysql();
    s.from("t", NO_COLUMNS).unwrap().limit(0, 20);
    assert_eq!(
        s.assemble().unwrap(),
        "SELECT * FROM `t` LIMIT 18446744073709551615 OFFSET 20"
    );
}

#[test]
fn test_auto_quote_disabled() {
    let mut s = Select::with_config(&SelectConfig::new().with_auto_quote(false));
    s.from("orders AS o", ["id"]).unwrap();
    assert_eq!(s.assemble().unwrap(), "SELECT o.id FROM orders AS o");
}

#[test]
fn test_order_rand() {
    let mut pg = Select::new();
    pg.from("t", NO_COLUMNS).unwrap().order_rand(None).unwrap();
    assert_eq!(pg.assemble().unwrap(), r#"SELECT * FROM "t" ORDER BY RANDOM()"#);

    let mut my = mysql();
    my.from("t", ["id"]).unwrap().order_rand(Some("rnd")).unwrap();
    assert_eq!(
        my.assemble().unwrap(),
        "SELECT `t`.`id`, RAND() AS `rnd` FROM `t` ORDER BY `rnd`"
    );
}

// ==================== union ====================

fn table_select(name: &str) -> Select {
    let mut s = Select::new();
    s.from(name, ["id"]).unwrap();
    s
}

#[test]
fn test_union_absorbs_first_select() {
    let mut s = Select::new();
    s.union([table_select("a"), table_select("b")], UnionKind::Union)
        .unwrap();
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT "a"."id" FROM "a" UNION SELECT "b"."id" FROM "b""#
    );
}

#[test]
fn test_union_single_member_becomes_base() {
    let mut member = table_select("a");
    member.and_where("a.id > 1");
    let mut s = Select::new();
    s.union([member], UnionKind::Union).unwrap();
    let sql = s.assemble().unwrap();
    assert_eq!(sql, r#"SELECT "a"."id" FROM "a" WHERE (a.id > 1)"#);
    assert!(!sql.contains("UNION"));
}

#[test]
fn test_absorbed_member_drops_its_unions() {
    let mut member = table_select("a");
    member
        .union([table_select("b")], UnionKind::UnionAll)
        .unwrap();
    let mut s = Select::new();
    s.union([member], UnionKind::Union).unwrap();
    assert_eq!(s.assemble().unwrap(), r#"SELECT "a"."id" FROM "a""#);
}

#[test]
fn test_union_onto_existing_base() {
    let mut s = table_select("a");
    s.union([table_select("b")], UnionKind::UnionAll).unwrap();
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT "a"."id" FROM "a" UNION ALL SELECT "b"."id" FROM "b""#
    );
}

#[test]
fn test_union_of_raw_members() {
    let mut s = Select::new();
    s.union(["SELECT 1", "SELECT 2"], UnionKind::UnionAll)
        .unwrap()
        .order(["1 DESC"])
        .limit(5, 0);
    assert_eq!(
        s.assemble().unwrap(),
        "SELECT 1 UNION ALL SELECT 2 ORDER BY 1 DESC LIMIT 5"
    );
}

#[test]
fn test_union_mixed_kinds() {
    let mut s = Select::new();
    s.union(["SELECT 1"], UnionKind::Union)
        .unwrap()
        .union(["SELECT 2"], UnionKind::UnionAll)
        .unwrap();
    assert_eq!(s.assemble().unwrap(), "SELECT 1 UNION ALL SELECT 2");
}

#[test]
fn test_union_requires_members() {
    let mut s = Select::new();
    let err = s
        .union(Vec::<Select>::new(), UnionKind::Union)
        .unwrap_err();
    assert!(matches!(err, QbError::UnionWithNoMembers));
}

// ==================== parts ====================

#[test]
fn test_reset_parts() {
    let mut s = Select::new();
    s.from("t", ["id"])
        .unwrap()
        .and_where("t.id > 1")
        .order(["id"])
        .limit(10, 0);

    s.reset(Part::Where);
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT "t"."id" FROM "t" ORDER BY "id" ASC LIMIT 10"#
    );

    s.reset_named("ORDER").unwrap().reset_named("limitcount").unwrap();
    assert_eq!(s.assemble().unwrap(), r#"SELECT "t"."id" FROM "t""#);

    s.reset_all();
    assert_eq!(s.assemble().unwrap(), "SELECT *");
}

#[test]
fn test_unknown_part_name() {
    let mut s = Select::new();
    assert!(matches!(
        s.reset_named("tables").unwrap_err(),
        QbError::InvalidPartName(ref p) if p == "tables"
    ));
    assert!(matches!(
        s.get_part_named("").unwrap_err(),
        QbError::InvalidPartName(_)
    ));
}

#[test]
fn test_get_part() {
    let mut s = Select::new();
    s.from("t", NO_COLUMNS).unwrap().limit(10, 5).distinct(true);
    assert!(matches!(s.get_part(Part::LimitCount), PartValue::LimitCount(Some(10))));
    assert!(matches!(
        s.get_part_named("limitoffset").unwrap(),
        PartValue::LimitOffset(Some(5))
    ));
    assert!(matches!(s.get_part(Part::Distinct), PartValue::Distinct(true)));
    match s.get_part(Part::From) {
        PartValue::From(tables) => assert_eq!(tables.len(), 1),
        other => panic!("unexpected part: {other:?}"),
    }
}

#[test]
fn test_set_part_normalizes_from() {
    let mut source = Select::new();
    source
        .from("a", NO_COLUMNS)
        .unwrap()
        .join_left("b", "b.id = a.b_id", NO_COLUMNS)
        .unwrap();
    let PartValue::From(mut tables) = source.get_part(Part::From) else {
        panic!("expected FROM part");
    };
    tables.remove(0);

    let mut s = Select::new();
    s.set_part(PartValue::From(tables)).unwrap();
    assert_eq!(s.tables()[0].join_type, JoinType::None);
    assert_eq!(s.assemble().unwrap(), r#"SELECT * FROM "b""#);
}

#[test]
fn test_set_part_rejects_duplicate_correlations() {
    let source = table_select("a");
    let PartValue::From(tables) = source.get_part(Part::From) else {
        panic!("expected FROM part");
    };
    let doubled = [tables.clone(), tables].concat();
    let mut s = Select::new();
    assert!(matches!(
        s.set_part(PartValue::From(doubled)).unwrap_err(),
        QbError::DuplicateCorrelation(_)
    ));
}

// ==================== display ====================

#[test]
fn test_display_swallows_render_errors() {
    let mut s = Select::new();
    s.from("orders", NO_COLUMNS).unwrap().group(["bad..name"]);
    assert!(matches!(
        s.assemble().unwrap_err(),
        QbError::InvalidIdentifier(_)
    ));
    assert_eq!(s.to_string(), "");
    assert_eq!(format!("[{s}]"), "[]");
}

// ==================== LEFT JOIN pruning ====================

fn orders_with_refunds() -> Select {
    let mut s = Select::new();
    s.from("orders", ["id"])
        .unwrap()
        .join_left("refunds", "orders.id = refunds.order_id", NO_COLUMNS)
        .unwrap();
    s
}

#[test]
fn test_prune_unused_left_join() {
    let mut s = orders_with_refunds();
    s.reset_join_left();
    assert!(!s.has_table("refunds"));
    assert_eq!(s.assemble().unwrap(), r#"SELECT "orders"."id" FROM "orders""#);
}

#[test]
fn test_prune_keeps_selected_table() {
    let mut s = orders_with_refunds();
    s.columns(["amount"], Some("refunds")).unwrap();
    s.reset_join_left();
    assert!(s.has_table("refunds"));
}

#[test]
fn test_prune_keeps_table_used_in_where() {
    let mut s = orders_with_refunds();
    s.and_where("refunds.id IS NULL");
    s.reset_join_left();
    assert!(s.has_table("refunds"));
}

#[test]
fn test_prune_keeps_table_used_in_raw_column() {
    let mut s = Select::new();
    s.from("orders AS o", ["id"])
        .unwrap()
        .join_left("refunds AS r", "r.order_id = o.id", NO_COLUMNS)
        .unwrap()
        .columns([expr("COALESCE(r.amount, 0)")], None)
        .unwrap();
    s.reset_join_left();
    assert!(s.has_table("r"));
}

#[test]
fn test_prune_matches_physical_name() {
    let mut s = Select::new();
    s.from("orders AS o", ["id"])
        .unwrap()
        .join_left("refunds AS r", "r.order_id = o.id", NO_COLUMNS)
        .unwrap()
        .and_where("refunds.amount > 0");
    s.reset_join_left();
    assert!(s.has_table("r"));
}

#[test]
fn test_prune_keeps_chain_feeding_used_table() {
    let mut s = Select::new();
    s.from("orders AS o", ["id"])
        .unwrap()
        .join_left("a", "a.order_id = o.id", NO_COLUMNS)
        .unwrap()
        .join_left("b", "a.x = b.y", ["name"])
        .unwrap();
    s.reset_join_left();
    assert_eq!(
        s.assemble().unwrap(),
        r#"SELECT "o"."id", "b"."name" FROM "orders" AS "o" LEFT JOIN "a" ON a.order_id = o.id LEFT JOIN "b" ON a.x = b.y"#
    );
}

#[test]
fn test_prune_removes_unused_chain() {
    let mut s = Select::new();
    s.from("orders AS o", ["id"])
        .unwrap()
        .join_left("a", "a.order_id = o.id", NO_COLUMNS)
        .unwrap()
        .join_left("b", "a.x = b.y", NO_COLUMNS)
        .unwrap();
    s.reset_join_left();
    assert_eq!(s.assemble().unwrap(), r#"SELECT "o"."id" FROM "orders" AS "o""#);
}

#[test]
fn test_prune_keeps_table_needed_by_inner_join() {
    let mut s = Select::new();
    s.from("orders AS o", ["id"])
        .unwrap()
        .join_left("a", "a.order_id = o.id", NO_COLUMNS)
        .unwrap()
        .join_inner("c", "c.a_id = a.id", NO_COLUMNS)
        .unwrap();
    s.reset_join_left();
    assert!(s.has_table("a"));
    assert!(s.has_table("c"));
}

#[test]
fn test_prune_ignores_name_collisions() {
    let mut s = Select::new();
    s.from("orders AS o", ["id"])
        .unwrap()
        .join_inner("promotions AS pr", "pr.order_id = o.id", NO_COLUMNS)
        .unwrap()
        .join_left("refunds AS r", "r.order_id = o.id", NO_COLUMNS)
        .unwrap()
        .and_where("pr.active");
    s.reset_join_left();
    assert!(!s.has_table("r"));
    assert!(s.has_table("pr"));
}

#[test]
fn test_prune_recognizes_quoted_reference() {
    let mut s = mysql();
    s.from("orders AS o", ["id"])
        .unwrap()
        .join_left("refunds AS r", "r.order_id = o.id", NO_COLUMNS)
        .unwrap()
        .and_where("`r`.amount > 0");
    s.reset_join_left();
    assert!(s.has_table("r"));
}

// ==================== derived DML ====================

fn staging() -> Select {
    let mut s = Select::new();
    s.from("staging AS s", ["id", "name"]).unwrap();
    s
}

#[test]
fn test_insert_from_select() {
    assert_eq!(
        staging()
            .insert_from_select_sql("users", &["id", "name"], InsertMode::Plain)
            .unwrap(),
        r#"INSERT INTO "users" ("id", "name") SELECT "s"."id", "s"."name" FROM "staging" AS "s""#
    );
    assert_eq!(
        staging()
            .insert_from_select_sql("users", &[], InsertMode::Ignore)
            .unwrap(),
        r#"INSERT INTO "users" SELECT "s"."id", "s"."name" FROM "staging" AS "s" ON CONFLICT DO NOTHING"#
    );

    let mut my = mysql();
    my.from("staging AS s", ["id"]).unwrap();
    assert_eq!(
        my.insert_from_select_sql("users", &["id"], InsertMode::Ignore)
            .unwrap(),
        "INSERT IGNORE INTO `users` (`id`) SELECT `s`.`id` FROM `staging` AS `s`"
    );
}

#[test]
fn test_update_from_select_postgres() {
    let mut s = Select::new();
    s.from("totals AS t", ["amount AS total", "NOW() AS updated_at"])
        .unwrap()
        .and_where("t.order_id = o.id");
    assert_eq!(
        s.update_from_select_sql("orders", Some("o")).unwrap(),
        r#"UPDATE "orders" AS "o" SET "total" = "t"."amount", "updated_at" = NOW() FROM "totals" AS "t" WHERE (t.order_id = o.id)"#
    );
}

#[test]
fn test_update_from_select_mysql() {
    let mut s = mysql();
    s.from("totals AS t", ["amount AS total"])
        .unwrap()
        .and_where("t.order_id = o.id");
    assert_eq!(
        s.update_from_select_sql("orders", Some("o")).unwrap(),
        "UPDATE `orders` AS `o` INNER JOIN `totals` AS `t` SET `o`.`total` = `t`.`amount` WHERE (t.order_id = o.id)"
    );
}

#[test]
fn test_update_from_select_requires_assignable_columns() {
    let mut s = Select::new();
    s.from("totals", NO_COLUMNS).unwrap();
    assert!(matches!(
        s.update_from_select_sql("orders", None).unwrap_err(),
        QbError::Validation(_)
    ));

    s.columns([expr("NOW()")], None).unwrap();
    assert!(matches!(
        s.update_from_select_sql("orders", None).unwrap_err(),
        QbError::Validation(_)
    ));
}

fn banned_orders(mut s: Select) -> Select {
    s.from("orders AS o", NO_COLUMNS)
        .unwrap()
        .join_inner("customers AS c", "c.id = o.customer_id", NO_COLUMNS)
        .unwrap()
        .and_where("c.banned");
    s
}

#[test]
fn test_delete_from_select_postgres() {
    let s = banned_orders(Select::new());
    assert_eq!(
        s.delete_from_select_sql("o").unwrap(),
        r#"DELETE FROM "orders" WHERE ctid IN (SELECT "o"."ctid" FROM "orders" AS "o" INNER JOIN "customers" AS "c" ON c.id = o.customer_id WHERE (c.banned))"#
    );
}

#[test]
fn test_delete_from_select_mysql() {
    let s = banned_orders(mysql());
    assert_eq!(
        s.delete_from_select_sql("o").unwrap(),
        "DELETE `o` FROM `orders` AS `o` INNER JOIN `customers` AS `c` ON c.id = o.customer_id WHERE (c.banned)"
    );
}

#[test]
fn test_delete_from_select_unknown_correlation() {
    let s = banned_orders(Select::new());
    assert!(matches!(
        s.delete_from_select_sql("x").unwrap_err(),
        QbError::UnknownCorrelation(ref c) if c == "x"
    ));
    let s = banned_orders(mysql());
    assert!(matches!(
        s.delete_from_select_sql("x").unwrap_err(),
        QbError::UnknownCorrelation(_)
    ));
}
