// comanda-client/tests/api_integration.rs
// API client and screen containers against an in-process backend

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use comanda_client::shared::models::{PaymentMethod, PaymentStatus, TableStatus};
use comanda_client::state::{
    AvailabilityFilter, CustomerFlow, FlowStep, MenuManager, OrderBoard, PaymentBoard,
    StatusFilter, TableBoard,
};
use comanda_client::shared::message::NotificationLevel;
use comanda_client::{ApiClient, ClientConfig, ClientError, OrderStatus};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Backend {
    orders: Mutex<Vec<Value>>,
    tables: Mutex<Vec<Value>>,
    payments: Mutex<Vec<Value>>,
    fail_status_updates: AtomicBool,
    fail_payments: AtomicBool,
}

type Shared = Arc<Backend>;

fn price_of(item_id: i64) -> f64 {
    match item_id {
        1 => 25.90,
        2 => 7.95,
        _ => 0.0,
    }
}

async fn available_tables() -> Json<Value> {
    Json(json!({
        "mesas_disponiveis": [
            {"mesa_id": 3, "numero": 3, "capacidade": 2, "status": "livre"},
            {"mesa_id": 4, "numero": 4, "capacidade": 4, "status": "livre"}
        ],
        "total_mesas": 10
    }))
}

async fn create_customer(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Cliente registrado",
            "cliente": {"cliente_id": 7, "nome": body["nome"], "mesa": body["mesa"]}
        })),
    )
}

async fn active_order(
    State(backend): State<Shared>,
    Path(customer_id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    let orders = backend.orders.lock().unwrap();
    let found = orders
        .iter()
        .find(|o| o["cliente_id"] == customer_id && o["status"] != "pago");
    match found {
        Some(order) => (StatusCode::OK, Json(json!({ "pedido": order }))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Nenhum pedido ativo"})),
        ),
    }
}

fn catalog() -> Vec<Value> {
    vec![
        json!({"item_id": 1, "nome": "Moqueca", "preco": 25.90, "categoria": "Pratos"}),
        json!({"item_id": 2, "nome": "Suco de Caju", "preco": 7.95, "categoria": "Bebidas"}),
        json!({"item_id": 3, "nome": "Pudim", "preco": 9.0, "categoria": "Sobremesas", "disponivel": false}),
    ]
}

fn failure(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
}

fn not_found(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message })))
}

/// Copy every key of `patch` onto `target`
fn merge(target: &mut Value, patch: &Value) {
    if let (Some(target), Some(patch)) = (target.as_object_mut(), patch.as_object()) {
        for (key, value) in patch {
            target.insert(key.clone(), value.clone());
        }
    }
}

async fn menu_items() -> Json<Value> {
    Json(json!({ "itens": catalog() }))
}

async fn update_menu_item(
    State(backend): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if backend.fail_status_updates.load(Ordering::SeqCst) {
        return failure("Falha ao atualizar item");
    }
    match catalog().into_iter().find(|i| i["item_id"] == id) {
        Some(mut item) => {
            merge(&mut item, &body);
            (StatusCode::OK, Json(json!({ "item": item })))
        }
        None => not_found("Item não encontrado"),
    }
}

async fn list_tables(State(backend): State<Shared>) -> Json<Value> {
    let tables = backend.tables.lock().unwrap();
    Json(json!({ "mesas": *tables }))
}

async fn update_table(
    State(backend): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if backend.fail_status_updates.load(Ordering::SeqCst) {
        return failure("Falha ao atualizar mesa");
    }
    let mut tables = backend.tables.lock().unwrap();
    match tables.iter_mut().find(|t| t["mesa_id"] == id) {
        Some(table) => {
            merge(table, &body);
            (StatusCode::OK, Json(json!({ "mesa": table })))
        }
        None => not_found("Mesa não encontrada"),
    }
}

async fn payment_for_order(
    State(backend): State<Shared>,
    Path(order_id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    let payments = backend.payments.lock().unwrap();
    match payments.iter().find(|p| p["pedido_id"] == order_id) {
        Some(payment) => (StatusCode::OK, Json(json!({ "pagamento": payment }))),
        None => not_found("Pagamento não encontrado"),
    }
}

async fn update_payment_status(
    State(backend): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if backend.fail_status_updates.load(Ordering::SeqCst) {
        return failure("Falha ao atualizar pagamento");
    }
    let mut payments = backend.payments.lock().unwrap();
    match payments.iter_mut().find(|p| p["pagamento_id"] == id) {
        Some(payment) => {
            payment["status"] = body["status"].clone();
            (StatusCode::OK, Json(json!({ "pagamento": payment })))
        }
        None => not_found("Pagamento não encontrado"),
    }
}

async fn list_orders(State(backend): State<Shared>) -> Json<Value> {
    let orders = backend.orders.lock().unwrap();
    Json(json!({ "pedidos": *orders }))
}

async fn create_order(
    State(backend): State<Shared>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let lines = body["itens"].as_array().cloned().unwrap_or_default();
    let total: f64 = lines
        .iter()
        .map(|l| price_of(l["item_id"].as_i64().unwrap()) * l["quantidade"].as_f64().unwrap())
        .sum();
    let mut orders = backend.orders.lock().unwrap();
    let order = json!({
        "pedido_id": 11 + orders.len() as i64,
        "cliente_id": body["cliente_id"],
        "status": "pendente",
        "data_hora": "2024-05-01T12:00:00",
        "total": (total * 100.0).round() / 100.0,
        "fechado": false,
        "itens": lines
    });
    orders.push(order.clone());
    (StatusCode::CREATED, Json(json!({"message": "Pedido criado", "pedido": order})))
}

async fn update_order_status(
    State(backend): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if backend.fail_status_updates.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Falha ao atualizar pedido"})),
        );
    }
    let mut orders = backend.orders.lock().unwrap();
    match orders.iter_mut().find(|o| o["pedido_id"] == id) {
        Some(order) => {
            order["status"] = body["status"].clone();
            (StatusCode::OK, Json(json!({ "pedido": order })))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Pedido não encontrado"})),
        ),
    }
}

async fn close_order(
    State(backend): State<Shared>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    let mut orders = backend.orders.lock().unwrap();
    match orders.iter_mut().find(|o| o["pedido_id"] == id) {
        Some(order) => {
            order["fechado"] = json!(true);
            order["status"] = json!("aguardando_pagamento");
            (StatusCode::OK, Json(json!({ "pedido": order })))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Pedido não encontrado"})),
        ),
    }
}

async fn create_payment(
    State(backend): State<Shared>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if backend.fail_payments.load(Ordering::SeqCst) {
        return failure("Falha ao registrar pagamento");
    }
    let mut orders = backend.orders.lock().unwrap();
    let Some(order) = orders.iter_mut().find(|o| o["pedido_id"] == body["pedido_id"]) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Pedido não encontrado"})),
        );
    };
    if order["fechado"] != true {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "O pedido precisa estar fechado"})),
        );
    }
    order["status"] = json!("pago");
    let amount = body["valor"].as_f64().unwrap();
    let tendered = body["valor_pago"].as_f64().unwrap_or(amount);
    (
        StatusCode::CREATED,
        Json(json!({
            "pagamento": {
                "pagamento_id": 90,
                "pedido_id": body["pedido_id"],
                "metodo": body["metodo"],
                "valor": amount,
                "valor_pago": tendered,
                "troco": ((tendered - amount) * 100.0).round() / 100.0,
                "status": "confirmado"
            }
        })),
    )
}

async fn spawn_backend(backend: Shared) -> ApiClient {
    let app = Router::new()
        .route("/api/mesas/disponiveis", get(available_tables))
        .route("/api/cliente", post(create_customer))
        .route("/api/mesas", get(list_tables))
        .route("/api/mesas/{id}", put(update_table))
        .route("/api/itens", get(menu_items))
        .route("/api/itens/{id}", put(update_menu_item))
        .route("/api/pedidos", get(list_orders).post(create_order))
        .route("/api/pedidos/{id}/status", put(update_order_status))
        .route("/api/pedidos/{id}/fechar", post(close_order))
        .route("/api/pedidos/cliente/{id}/ativo", get(active_order))
        .route("/api/pagamentos", post(create_payment))
        .route("/api/pagamentos/{id}/status", put(update_payment_status))
        .route("/api/pagamentos/pedido/{id}", get(payment_for_order))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ClientConfig::default().with_api_base_url(format!("http://{addr}"));
    ApiClient::from_config(&config).unwrap()
}

fn seed_order(id: i64, status: &str, customer: &str, table: i32) -> Value {
    json!({
        "pedido_id": id,
        "cliente_id": id * 10,
        "status": status,
        "data_hora": "2024-05-01T12:00:00",
        "total": 30.0,
        "fechado": false,
        "itens": [],
        "cliente": {"cliente_id": id * 10, "nome": customer, "mesa": table}
    })
}

#[tokio::test]
async fn test_envelopes_and_errors() {
    let api = spawn_backend(Shared::default()).await;

    let tables = api.list_available_tables().await.unwrap();
    assert_eq!(tables.total, 10);
    assert_eq!(tables.tables.len(), 2);

    let items = api.list_menu_items().await.unwrap();
    assert_eq!(items[0].price_label(), "R$ 25.90");
    assert!(!items[2].available);

    // 404 on the active order means "no order", not an error
    assert!(api.get_active_order(7).await.unwrap().is_none());

    let err = api.close_order(99).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message(), "Pedido não encontrado");

    let err = api.create_order(7, Vec::new()).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_customer_flow_cash_payment() {
    let api = Arc::new(spawn_backend(Shared::default()).await);
    let mut flow = CustomerFlow::new(api);

    flow.load_tables().await.unwrap();
    assert!(flow.select_table(9).is_err());
    assert_eq!(flow.screen.error.as_deref(), Some("Mesa 9 indisponível"));

    flow.set_name("Ana");
    assert!(!flow.can_submit());
    flow.select_table(4).unwrap();
    assert_eq!(flow.selection_message().as_deref(), Some("Mesa 4 selecionada"));
    assert!(flow.can_submit());

    flow.identify().await.unwrap();
    assert_eq!(flow.step(), FlowStep::Menu);
    assert_eq!(flow.customer().unwrap().id, 7);
    assert!(flow.active_order().is_none());
    assert_eq!(flow.visible_menu().len(), 2);
    assert!(flow.add_to_cart(3).is_err());

    flow.add_to_cart(1).unwrap();
    flow.add_to_cart(2).unwrap();
    flow.add_to_cart(2).unwrap();
    assert_eq!(flow.cart().total_label(), "R$ 41.80");

    let order = flow.submit_order().await.unwrap();
    assert_eq!(flow.step(), FlowStep::Order);
    assert!(flow.cart().is_empty());
    assert_eq!(order.total, Decimal::new(4180, 2));

    // Short cash is rejected before anything is sent
    let err = flow
        .pay(PaymentMethod::Cash, Some(Decimal::new(40, 0)))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Valor insuficiente: R$ 1.80");
    assert_eq!(flow.step(), FlowStep::Order);

    let payment = flow
        .pay(PaymentMethod::Cash, Some(Decimal::new(50, 0)))
        .await
        .unwrap();
    assert_eq!(flow.step(), FlowStep::Finished);
    assert_eq!(flow.change(), Some(Decimal::new(820, 2)));
    assert_eq!(payment.method, PaymentMethod::Cash);
    assert!(flow.active_order().unwrap().closed);

    flow.reset();
    assert_eq!(flow.step(), FlowStep::Identify);
    assert!(flow.customer().is_none());
}

#[tokio::test]
async fn test_order_board_filter_and_search() {
    let backend = Shared::default();
    backend.orders.lock().unwrap().extend([
        seed_order(1, "pronto", "Ana", 4),
        seed_order(2, "preparando", "Bruno", 2),
        seed_order(3, "pronto", "Carla", 6),
    ]);
    let api = Arc::new(spawn_backend(backend).await);
    let mut board = OrderBoard::new(api);
    board.load().await.unwrap();

    board.set_status_filter("Pronto").unwrap();
    assert_eq!(board.filter(), StatusFilter::Only(OrderStatus::Ready));
    let ids: Vec<i64> = board.visible_orders().iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![1, 3]);

    board.set_search("carla");
    let ids: Vec<i64> = board.visible_orders().iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![3]);

    board.set_search("");
    board.set_status_filter("Todos").unwrap();
    assert_eq!(board.visible_orders().len(), 3);

    assert!(board.set_status_filter("Voando").is_err());
    assert!(board.screen.error.is_some());
}

#[tokio::test]
async fn test_order_board_status_change() {
    let backend = Shared::default();
    backend
        .orders
        .lock()
        .unwrap()
        .push(seed_order(1, "preparando", "Ana", 4));
    let api = Arc::new(spawn_backend(backend.clone()).await);
    let mut board = OrderBoard::new(api);
    board.load().await.unwrap();

    let labels: Vec<&str> = board.actions_for(1).iter().map(|a| a.label).collect();
    assert_eq!(labels, vec!["Marcar Pronto"]);

    // Not a legal transition: nothing is sent
    assert!(board.change_status(1, OrderStatus::Paid).await.is_err());
    assert_eq!(board.get(1).unwrap().status, OrderStatus::Preparing);

    // Server failure reverts the optimistic status
    backend.fail_status_updates.store(true, Ordering::SeqCst);
    let err = board.change_status(1, OrderStatus::Ready).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(board.get(1).unwrap().status, OrderStatus::Preparing);
    assert_eq!(board.screen.error.as_deref(), Some("Falha ao atualizar pedido"));
    assert!(!board.is_pending(1));

    backend.fail_status_updates.store(false, Ordering::SeqCst);
    let order = board.change_status(1, OrderStatus::Ready).await.unwrap();
    assert_eq!(order.status, OrderStatus::Ready);
    assert_eq!(board.get(1).unwrap().status, OrderStatus::Ready);
    assert!(board.screen.error.is_none());
}

#[tokio::test]
async fn test_failed_payment_keeps_no_change() {
    let backend = Shared::default();
    let api = Arc::new(spawn_backend(backend.clone()).await);
    let mut flow = CustomerFlow::new(api);
    flow.load_tables().await.unwrap();
    flow.set_name("Ana");
    flow.select_table(3).unwrap();
    flow.identify().await.unwrap();
    flow.add_to_cart(1).unwrap();
    flow.submit_order().await.unwrap();

    backend.fail_payments.store(true, Ordering::SeqCst);
    let err = flow
        .pay(PaymentMethod::Cash, Some(Decimal::new(30, 0)))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(flow.change(), None);
    assert!(flow.payment().is_none());
    assert_eq!(flow.step(), FlowStep::Payment);
    assert_eq!(flow.screen.error.as_deref(), Some("Falha ao registrar pagamento"));

    backend.fail_payments.store(false, Ordering::SeqCst);
    flow.pay(PaymentMethod::Cash, Some(Decimal::new(30, 0)))
        .await
        .unwrap();
    assert_eq!(flow.change(), Some(Decimal::new(410, 2)));
    assert_eq!(flow.step(), FlowStep::Finished);
}

#[tokio::test]
async fn test_status_change_failure_raises_notification() {
    let backend = Shared::default();
    backend
        .orders
        .lock()
        .unwrap()
        .push(seed_order(2, "pronto", "Bruno", 2));
    backend.fail_status_updates.store(true, Ordering::SeqCst);
    let api = Arc::new(spawn_backend(backend).await);
    let mut board = OrderBoard::new(api);
    board.load().await.unwrap();

    assert!(board.change_status(2, OrderStatus::Delivered).await.is_err());
    let note = board.notification().unwrap();
    assert_eq!(note.level, NotificationLevel::Error);
    assert_eq!(
        note.message,
        "Erro ao atualizar pedido #2: Falha ao atualizar pedido"
    );
}

#[tokio::test]
async fn test_menu_availability_toggle() {
    let backend = Shared::default();
    let api = Arc::new(spawn_backend(backend.clone()).await);
    let mut menu = MenuManager::new(api);

    // No category route: the item list still loads
    menu.load().await.unwrap();
    assert_eq!(menu.items().len(), 3);
    assert!(menu.categories().is_empty());
    assert!(menu.category_names().contains(&"Bebidas".to_string()));

    menu.set_availability_filter(AvailabilityFilter::Unavailable);
    let ids: Vec<i64> = menu.visible_items().iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![3]);

    let item = menu.toggle_availability(3).await.unwrap();
    assert!(item.available);
    assert!(menu.visible_items().is_empty());
    assert!(!menu.is_pending(3));

    // Server failure puts the old value back
    backend.fail_status_updates.store(true, Ordering::SeqCst);
    menu.set_availability_filter(AvailabilityFilter::All);
    assert!(menu.toggle_availability(1).await.is_err());
    assert!(menu.items().iter().find(|i| i.id == 1).unwrap().available);
    assert_eq!(menu.screen.error.as_deref(), Some("Falha ao atualizar item"));
    assert!(!menu.is_pending(1));

    assert!(menu.toggle_availability(42).await.is_err());
    assert_eq!(menu.screen.error.as_deref(), Some("Item não encontrado"));
}

#[tokio::test]
async fn test_table_board_status() {
    let backend = Shared::default();
    backend.tables.lock().unwrap().extend([
        json!({"mesa_id": 2, "numero": 2, "capacidade": 4, "status": "ocupada"}),
        json!({"mesa_id": 1, "numero": 1, "capacidade": 2, "status": "livre"}),
    ]);
    let api = Arc::new(spawn_backend(backend.clone()).await);
    let mut board = TableBoard::new(api);
    board.load().await.unwrap();

    let numbers: Vec<i32> = board.tables().iter().map(|t| t.number).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert_eq!(board.count(TableStatus::Free), 1);

    let table = board.set_status(1, TableStatus::Occupied).await.unwrap();
    assert_eq!(table.status, TableStatus::Occupied);
    assert_eq!(board.count(TableStatus::Occupied), 2);

    backend.fail_status_updates.store(true, Ordering::SeqCst);
    let err = board.set_status(2, TableStatus::Cleaning).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(board.get(2).unwrap().status, TableStatus::Occupied);
    assert_eq!(board.count(TableStatus::Cleaning), 0);
    assert_eq!(board.screen.error.as_deref(), Some("Falha ao atualizar mesa"));
    assert!(!board.is_pending(2));
}

#[tokio::test]
async fn test_payment_board_confirm_and_totals() {
    let backend = Shared::default();
    backend.payments.lock().unwrap().extend([
        json!({"pagamento_id": 1, "pedido_id": 10, "metodo": "PIX", "valor": 30.0, "status": "pendente"}),
        json!({"pagamento_id": 2, "pedido_id": 11, "metodo": "Dinheiro", "valor": 12.5, "status": "pendente"}),
    ]);
    let api = Arc::new(spawn_backend(backend.clone()).await);
    let mut board = PaymentBoard::new(api);
    board.load_for_order(10).await.unwrap();
    board.load_for_order(11).await.unwrap();
    assert_eq!(board.pending_total(), Decimal::new(425, 1));
    assert!(board.load_for_order(12).await.is_err());
    assert_eq!(board.screen.error.as_deref(), Some("Pagamento não encontrado"));

    let payment = board.confirm(1).await.unwrap();
    assert_eq!(payment.status, PaymentStatus::Confirmed);
    assert_eq!(board.confirmed_total_label(), "R$ 30.00");

    board.set_status_filter(Some(PaymentStatus::Pending));
    let ids: Vec<i64> = board.visible_payments().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2]);

    // Server failure keeps the payment pending
    backend.fail_status_updates.store(true, Ordering::SeqCst);
    assert!(board.cancel(2).await.is_err());
    assert_eq!(board.get(2).unwrap().status, PaymentStatus::Pending);
    assert_eq!(board.screen.error.as_deref(), Some("Falha ao atualizar pagamento"));

    backend.fail_status_updates.store(false, Ordering::SeqCst);
    board.confirm(2).await.unwrap();
    let totals = board.totals_by_method();
    assert_eq!(totals[0], (PaymentMethod::Cash, Decimal::new(125, 1)));
    assert_eq!(totals[3], (PaymentMethod::Pix, Decimal::new(30, 0)));
    assert_eq!(board.pending_total(), Decimal::ZERO);
    assert!(board.visible_payments().is_empty());
}
