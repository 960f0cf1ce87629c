use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection};

use super::catalog::{product_from_row, variation_from_row};
use crate::{
    db_types::{NewOrder, Order, OrderDetail, OrderId, OrderItem, OrderLine, OrderStatusType, PaymentDetails},
    order_objects::OrderQueryFilter,
    traits::LedgerError,
};

/// Inserts a new order and its items using the given connection. This is not atomic. Embed the call inside a
/// transaction and pass `&mut *tx` as the connection argument so that an order is never stored without its items.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, LedgerError> {
    if order.items.is_empty() {
        return Err(LedgerError::EmptyOrder);
    }
    if fetch_order_row(&order.id, conn).await?.is_some() {
        return Err(LedgerError::OrderAlreadyExists(order.id));
    }
    let mut inserted: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (id, store_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING *;
        "#,
    )
    .bind(order.id.as_str())
    .bind(order.store_id.as_str())
    .bind(OrderStatusType::Pending.to_string())
    .bind(order.created_at)
    .fetch_one(&mut *conn)
    .await?;
    for (position, item) in order.items.into_iter().enumerate() {
        let item: OrderItem = sqlx::query_as(
            r#"
            INSERT INTO order_items (order_id, position, product_id, variation_id, unit_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
        )
        .bind(inserted.id.as_str())
        .bind(position as i64)
        .bind(item.product_id.as_str())
        .bind(item.variation_id.as_ref().map(|v| v.as_str()))
        .bind(item.unit_price)
        .fetch_one(&mut *conn)
        .await?;
        inserted.items.push(item);
    }
    debug!("📝️ Order {} inserted with {} items", inserted.id, inserted.items.len());
    Ok(inserted)
}

async fn fetch_order_row(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(order_id.as_str()).fetch_optional(conn).await
}

/// Returns the order with its items, if it exists.
pub async fn fetch_order(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = match fetch_order_row(order_id, conn).await? {
        Some(order) => order,
        None => return Ok(None),
    };
    let mut orders = attach_items(vec![order], conn).await?;
    Ok(orders.pop())
}

/// Fetches orders according to criteria specified in the `OrderQueryFilter`, including their items.
///
/// Resulting orders are ordered by `created_at` in descending order
pub async fn search_orders(query: OrderQueryFilter, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders = search_order_rows(query, conn).await?;
    attach_items(orders, conn).await
}

/// As [`search_orders`], with each item's product and variation attached.
pub async fn fetch_order_details(
    query: OrderQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderDetail>, sqlx::Error> {
    let orders = search_order_rows(query, conn).await?;
    let ids = orders.iter().map(|o| o.id.clone()).collect::<Vec<OrderId>>();
    let mut lines = fetch_lines(&ids, conn).await?;
    let details = orders
        .into_iter()
        .map(|mut order| {
            let lines = lines.remove(&order.id).unwrap_or_default();
            order.items = lines.iter().map(|l| l.item.clone()).collect();
            OrderDetail { order, lines }
        })
        .collect();
    Ok(details)
}

async fn search_order_rows(query: OrderQueryFilter, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM orders ");
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(store_id) = query.store_id {
        where_clause.push("store_id = ");
        where_clause.push_bind_unseparated(store_id);
    }
    if let Some(order_id) = query.order_id {
        where_clause.push("id = ");
        where_clause.push_bind_unseparated(order_id);
    }
    if let Some(statuses) = query.status.filter(|s| !s.is_empty()) {
        where_clause.push("status IN (");
        for (i, status) in statuses.iter().enumerate() {
            if i > 0 {
                where_clause.push_unseparated(", ");
            }
            where_clause.push_bind_unseparated(status.to_string());
        }
        where_clause.push_unseparated(")");
    }
    if let Some(since) = query.since {
        where_clause.push("julianday(created_at) >= julianday(");
        where_clause.push_bind_unseparated(since);
        where_clause.push_unseparated(")");
    }
    if let Some(until) = query.until {
        where_clause.push("julianday(created_at) <= julianday(");
        where_clause.push_bind_unseparated(until);
        where_clause.push_unseparated(")");
    }
    builder.push(" ORDER BY created_at DESC, rowid DESC");

    trace!("📝️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<Order>().fetch_all(conn).await?;
    trace!("📝️ Result of search_orders: {}", orders.len());
    Ok(orders)
}

async fn attach_items(mut orders: Vec<Order>, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    if orders.is_empty() {
        return Ok(orders);
    }
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM order_items WHERE order_id IN (");
    let mut id_list = builder.separated(", ");
    for order in &orders {
        id_list.push_bind(order.id.clone());
    }
    id_list.push_unseparated(")");
    builder.push(" ORDER BY order_id, position");
    let items = builder.build_query_as::<OrderItem>().fetch_all(conn).await?;
    let mut grouped = HashMap::<OrderId, Vec<OrderItem>>::new();
    for item in items {
        grouped.entry(item.order_id.clone()).or_default().push(item);
    }
    for order in &mut orders {
        order.items = grouped.remove(&order.id).unwrap_or_default();
    }
    Ok(orders)
}

async fn fetch_lines(
    order_ids: &[OrderId],
    conn: &mut SqliteConnection,
) -> Result<HashMap<OrderId, Vec<OrderLine>>, sqlx::Error> {
    let mut result = HashMap::<OrderId, Vec<OrderLine>>::new();
    if order_ids.is_empty() {
        return Ok(result);
    }
    let mut builder = QueryBuilder::<Sqlite>::new(
        r#"
    SELECT
        oi.id, oi.order_id, oi.position, oi.product_id, oi.variation_id, oi.unit_price,
        p.id AS p_id, p.store_id AS p_store_id, p.category_id AS p_category_id, p.name AS p_name,
        p.description AS p_description, p.price AS p_price, p.is_featured AS p_is_featured,
        p.is_archived AS p_is_archived, p.created_at AS p_created_at, p.updated_at AS p_updated_at,
        v.id AS v_id, v.product_id AS v_product_id, v.size_id AS v_size_id, v.color_id AS v_color_id,
        v.price AS v_price, v.stock AS v_stock, v.created_at AS v_created_at
    FROM order_items oi
    LEFT JOIN products p ON oi.product_id = p.id
    LEFT JOIN variations v ON oi.variation_id = v.id
    WHERE oi.order_id IN ("#,
    );
    let mut id_list = builder.separated(", ");
    for id in order_ids {
        id_list.push_bind(id.clone());
    }
    id_list.push_unseparated(")");
    builder.push(" ORDER BY oi.order_id, oi.position");
    let rows = builder.build().fetch_all(conn).await?;
    for row in &rows {
        let item = OrderItem {
            id: row.try_get("id")?,
            order_id: row.try_get("order_id")?,
            position: row.try_get("position")?,
            product_id: row.try_get("product_id")?,
            variation_id: row.try_get("variation_id")?,
            unit_price: row.try_get("unit_price")?,
        };
        let product = match row.try_get::<Option<String>, _>("p_id")? {
            Some(_) => Some(product_from_row(row, "p_")?),
            None => None,
        };
        let variation = match row.try_get::<Option<String>, _>("v_id")? {
            Some(_) => Some(variation_from_row(row, "v_")?),
            None => None,
        };
        result.entry(item.order_id.clone()).or_default().push(OrderLine { item, product, variation });
    }
    Ok(result)
}

/// Checks that the order exists and may move to `new_status`, returning its current status.
async fn check_transition(
    order_id: &OrderId,
    new_status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<OrderStatusType, LedgerError> {
    let current = sqlx::query_scalar::<_, OrderStatusType>("SELECT status FROM orders WHERE id = $1")
        .bind(order_id.as_str())
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| LedgerError::OrderNotFound(order_id.clone()))?;
    if !current.can_transition_to(new_status) {
        return Err(LedgerError::InvalidStatusTransition { order_id: order_id.clone(), from: current, to: new_status });
    }
    Ok(current)
}

/// Stores the payment session id and moves the order to `AwaitingPayment`.
pub async fn set_payment_session(
    order_id: &OrderId,
    session_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Order, LedgerError> {
    let new_status = OrderStatusType::AwaitingPayment;
    let current = check_transition(order_id, new_status, conn).await?;
    let order: Option<Order> = sqlx::query_as(
        r#"UPDATE orders SET status = $1, payment_session_id = $2, updated_at = $3
        WHERE id = $4 AND status = $5 RETURNING *"#,
    )
    .bind(new_status.to_string())
    .bind(session_id)
    .bind(Utc::now())
    .bind(order_id.as_str())
    .bind(current.to_string())
    .fetch_optional(&mut *conn)
    .await?;
    finish_transition(order_id, order, current, new_status, conn).await
}

/// Marks the order as paid, storing the customer details collected by the payment processor.
pub async fn mark_paid(
    order_id: &OrderId,
    details: PaymentDetails,
    conn: &mut SqliteConnection,
) -> Result<Order, LedgerError> {
    let new_status = OrderStatusType::Paid;
    let current = check_transition(order_id, new_status, conn).await?;
    let order: Option<Order> = sqlx::query_as(
        r#"UPDATE orders SET status = $1, address = $2, phone = $3, updated_at = $4
        WHERE id = $5 AND status = $6 RETURNING *"#,
    )
    .bind(new_status.to_string())
    .bind(details.address)
    .bind(details.phone)
    .bind(Utc::now())
    .bind(order_id.as_str())
    .bind(current.to_string())
    .fetch_optional(&mut *conn)
    .await?;
    finish_transition(order_id, order, current, new_status, conn).await
}

/// The status guard in the UPDATE catches concurrent changes made after the transition was checked.
async fn finish_transition(
    order_id: &OrderId,
    updated: Option<Order>,
    from: OrderStatusType,
    to: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Order, LedgerError> {
    let order = updated.ok_or_else(|| LedgerError::InvalidStatusTransition { order_id: order_id.clone(), from, to })?;
    debug!("📝️ Order {order_id} moved from {from} to {to}");
    let mut orders = attach_items(vec![order], conn).await?;
    orders.pop().ok_or_else(|| LedgerError::OrderNotFound(order_id.clone()))
}

/// Marks every unpaid order last updated before `cutoff` as abandoned.
pub async fn abandon_orders_before(
    cutoff: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE orders SET status = ");
    builder.push_bind(OrderStatusType::Abandoned.to_string());
    builder.push(", updated_at = ");
    builder.push_bind(Utc::now());
    builder.push(" WHERE status IN (");
    let mut statuses = builder.separated(", ");
    for status in OrderStatusType::unpaid() {
        statuses.push_bind(status.to_string());
    }
    statuses.push_unseparated(")");
    builder.push(" AND julianday(updated_at) < julianday(");
    builder.push_bind(cutoff);
    builder.push(") RETURNING *");
    let orders = builder.build_query_as::<Order>().fetch_all(&mut *conn).await?;
    attach_items(orders, conn).await
}
