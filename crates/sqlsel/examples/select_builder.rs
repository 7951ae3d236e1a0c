//! SELECT builder example for sqlsel
//!
//! Run with: cargo run --example select_builder -p sqlsel
//!
//! Only renders SQL; no database connection is needed.

use sqlsel::{
    DialectKind, InsertMode, NO_COLUMNS, Part, QbError, Select, SelectConfig, UnionKind, expr,
};

fn report(config: &SelectConfig) -> Result<Select, QbError> {
    let mut s = Select::with_config(config);
    s.from("orders AS o", ["id", "total", "o.created_at AS placed"])?
        .join_inner("customers AS c", "c.id = o.customer_id", ["name AS customer"])?
        .join_left("refunds AS r", "r.order_id = o.id", NO_COLUMNS)?
        .join_left("coupons AS cp", "cp.id = o.coupon_id", NO_COLUMNS)?
        .and_where_value("o.status = ?", "paid")
        .and_where("r.id IS NULL")
        .order(["placed DESC", "o.id"])
        .limit_page(3, 20);
    Ok(s)
}

fn main() -> Result<(), QbError> {
    // ============================================
    // One statement, two dialects
    // ============================================
    println!("=== Dialects ===");
    let postgres = SelectConfig::new();
    let mysql = SelectConfig::new().with_dialect(DialectKind::MySql);

    for config in [&postgres, &mysql] {
        let s = report(config)?;
        println!("{:?}: {}", config.dialect, s.assemble()?);
    }

    // ============================================
    // LEFT JOIN pruning
    // ============================================
    println!("\n=== reset_join_left ===");
    let mut s = report(&postgres)?;
    println!("before: {} tables", s.tables().len());
    s.reset_join_left();
    println!("after:  {} tables", s.tables().len());
    println!("{s}");

    // ============================================
    // Aggregates
    // ============================================
    println!("\n=== GROUP BY / HAVING ===");
    let mut s = Select::new();
    s.from("orders AS o", [expr("COUNT(*) AS orders"), expr("SUM(o.total) AS revenue")])?
        .columns(["customer_id"], Some("o"))?
        .group(["o.customer_id"])
        .having_value("SUM(o.total) > ?", 1000)
        .order(["revenue DESC"]);
    println!("{s}");

    // ============================================
    // Unions
    // ============================================
    println!("\n=== UNION ===");
    let mut active = Select::new();
    active.from("users", ["id", "email"])?.and_where("users.active");
    let mut invited = Select::new();
    invited.from("invites", ["id", "email"])?;

    let mut s = Select::new();
    s.union([active, invited], UnionKind::Union)?
        .union(["SELECT 0, 'system@localhost'"], UnionKind::UnionAll)?;
    println!("{s}");

    // ============================================
    // Inspecting and editing parts
    // ============================================
    println!("\n=== Parts ===");
    let mut s = report(&postgres)?;
    println!("order: {:?}", s.get_part(Part::Order));
    s.reset(Part::Order).reset(Part::LimitCount).reset(Part::LimitOffset);
    println!("{s}");

    // ============================================
    // Derived DML
    // ============================================
    println!("\n=== Derived DML ===");
    let mut src = Select::new();
    src.from("staging AS s", ["id", "name"])?
        .and_where("s.valid");
    println!(
        "{}",
        src.insert_from_select_sql("items", &["id", "name"], InsertMode::Ignore)?
    );

    let mut prices = Select::new();
    prices
        .from("price_updates AS p", ["price"])?
        .and_where("p.item_id = i.id");
    println!("{}", prices.update_from_select_sql("items", Some("i"))?);

    let mut stale = Select::new();
    stale
        .from("items AS i", NO_COLUMNS)?
        .and_where("i.updated_at < now() - interval '1 year'");
    println!("{}", stale.delete_from_select_sql("i")?);

    let mut stale_mysql = Select::with_config(&mysql);
    stale_mysql
        .from("items AS i", NO_COLUMNS)?
        .and_where("i.updated_at < now() - interval 1 year");
    println!("{}", stale_mysql.delete_from_select_sql("i")?);

    Ok(())
}
