use std::collections::BTreeSet;
use tenant_suite::clients::{PlanClient, UserClient};
use tenant_suite::framework::{mock::MockClient, ActorClient};
use tenant_suite::model::{
    BillingCycle, Order, OrderCreate, OrderStatus, PaymentMethod, Plan, PlanId, PlanStatus, Role,
    User, UserId, UserLimit,
};
use tenant_suite::order_actor::OrderError;
use tenant_suite::user_actor::UserError;

fn company(id: u32) -> User {
    User {
        id: UserId(id),
        name: "Acme".to_string(),
        email: "owner@acme.io".to_string(),
        role: Role::Company,
        created_by: None,
        active_plan: None,
        plan_expire_date: None,
        total_users: UserLimit::Limited(0),
        storage_used_mb: 0,
        storage_limit_mb: None,
        active_modules: BTreeSet::new(),
        permissions: BTreeSet::new(),
        is_disabled: false,
    }
}

fn plan(id: u32, status: PlanStatus) -> Plan {
    Plan {
        id: PlanId(id),
        name: "Pro".to_string(),
        price_monthly: 2_900,
        price_yearly: 29_000,
        price_per_user_monthly: 0,
        price_per_user_yearly: 0,
        max_users: UserLimit::Limited(5),
        storage_limit_mb: None,
        trial_days: 0,
        modules: BTreeSet::new(),
        is_free: false,
        status,
    }
}

fn order_params() -> OrderCreate {
    OrderCreate {
        tenant: UserId(1),
        plan: PlanId(2),
        cycle: BillingCycle::Month,
        modules: BTreeSet::new(),
        user_count: None,
        list_price: 2_900,
        coupon: None,
        discount: 0,
        payment_method: PaymentMethod::BankTransfer,
        receipt: Some("receipt-1".to_string()),
    }
}

/// Real Order actor with mocked User and Plan dependencies.
/// `Order::on_create` fetches the buyer, then the plan.
#[tokio::test]
async fn test_order_actor_with_mocked_dependencies() {
    let mut user_mock = MockClient::<User>::new();
    let mut plan_mock = MockClient::<Plan>::new();

    user_mock.expect_get(UserId(1)).return_ok(Some(company(1)));
    plan_mock
        .expect_get(PlanId(2))
        .return_ok(Some(plan(2, PlanStatus::Active)));

    let user_client = UserClient::new(user_mock.client());
    let plan_client = PlanClient::new(plan_mock.client());

    let (order_actor, order_client) = tenant_suite::order_actor::new(8);
    let actor_handle = tokio::spawn(order_actor.run((user_client, plan_client)));

    let order_id = order_client
        .create_order(order_params())
        .await
        .expect("order should be created");

    let order: Order = order_client.fetch(order_id).await.unwrap();
    assert_eq!(order.tenant, UserId(1));
    assert_eq!(order.final_price, 2_900);
    assert_eq!(order.status, OrderStatus::Pending);

    user_mock.verify();
    plan_mock.verify();

    drop(order_client);
    actor_handle.await.unwrap();
}

#[tokio::test]
async fn test_order_rejected_for_staff_buyer() {
    let mut user_mock = MockClient::<User>::new();
    let plan_mock = MockClient::<Plan>::new();

    let mut staff = company(3);
    staff.role = Role::Staff;
    staff.created_by = Some(UserId(1));
    user_mock.expect_get(UserId(3)).return_ok(Some(staff));

    let (order_actor, order_client) = tenant_suite::order_actor::new(8);
    let actor_handle = tokio::spawn(order_actor.run((
        UserClient::new(user_mock.client()),
        PlanClient::new(plan_mock.client()),
    )));

    let mut params = order_params();
    params.tenant = UserId(3);
    let err = order_client.create_order(params).await.unwrap_err();
    assert_eq!(err, OrderError::InvalidTenant("user_3".to_string()));

    // Nothing was stored and the plan was never looked up.
    assert!(order_client.pending().await.unwrap().is_empty());
    user_mock.verify();
    plan_mock.verify();

    drop(order_client);
    actor_handle.await.unwrap();
}

#[tokio::test]
async fn test_order_rejected_for_unknown_buyer_and_deleted_plan() {
    let mut user_mock = MockClient::<User>::new();
    let mut plan_mock = MockClient::<Plan>::new();

    user_mock.expect_get(UserId(1)).return_ok(None);
    user_mock.expect_get(UserId(1)).return_ok(Some(company(1)));
    plan_mock
        .expect_get(PlanId(2))
        .return_ok(Some(plan(2, PlanStatus::Deleted)));

    let (order_actor, order_client) = tenant_suite::order_actor::new(8);
    let actor_handle = tokio::spawn(order_actor.run((
        UserClient::new(user_mock.client()),
        PlanClient::new(plan_mock.client()),
    )));

    let err = order_client.create_order(order_params()).await.unwrap_err();
    assert_eq!(
        err,
        OrderError::User(UserError::NotFound("user_1".to_string()))
    );

    let err = order_client.create_order(order_params()).await.unwrap_err();
    assert_eq!(err, OrderError::PlanUnavailable);

    user_mock.verify();
    plan_mock.verify();

    drop(order_client);
    actor_handle.await.unwrap();
}

#[tokio::test]
async fn test_payment_form_is_checked_before_dependencies() {
    let user_mock = MockClient::<User>::new();
    let plan_mock = MockClient::<Plan>::new();

    let (order_actor, order_client) = tenant_suite::order_actor::new(8);
    let actor_handle = tokio::spawn(order_actor.run((
        UserClient::new(user_mock.client()),
        PlanClient::new(plan_mock.client()),
    )));

    let mut params = order_params();
    params.receipt = None;
    assert!(matches!(
        order_client.create_order(params).await,
        Err(OrderError::Validation(_))
    ));

    let mut params = order_params();
    params.discount = 3_000;
    assert!(matches!(
        order_client.create_order(params).await,
        Err(OrderError::Validation(_))
    ));

    let mut params = order_params();
    params.payment_method = PaymentMethod::Free;
    assert!(matches!(
        order_client.create_order(params).await,
        Err(OrderError::Validation(_))
    ));

    drop(order_client);
    actor_handle.await.unwrap();
}

#[tokio::test]
async fn test_decided_orders_are_final() {
    let mut user_mock = MockClient::<User>::new();
    let mut plan_mock = MockClient::<Plan>::new();

    for _ in 0..2 {
        user_mock.expect_get(UserId(1)).return_ok(Some(company(1)));
        plan_mock
            .expect_get(PlanId(2))
            .return_ok(Some(plan(2, PlanStatus::Active)));
    }

    let (order_actor, order_client) = tenant_suite::order_actor::new(8);
    let actor_handle = tokio::spawn(order_actor.run((
        UserClient::new(user_mock.client()),
        PlanClient::new(plan_mock.client()),
    )));

    let rejected = order_client.create_order(order_params()).await.unwrap();
    let order = order_client
        .reject(rejected, "receipt unreadable".to_string())
        .await
        .unwrap();
    assert_eq!(
        order.status,
        OrderStatus::Rejected {
            reason: "receipt unreadable".to_string()
        }
    );
    assert_eq!(
        order_client.approve(rejected).await,
        Err(OrderError::NotPending(rejected.to_string()))
    );

    let approved = order_client.create_order(order_params()).await.unwrap();
    order_client.approve(approved).await.unwrap();
    assert_eq!(
        order_client.reject(approved, "too late".to_string()).await,
        Err(OrderError::NotPending(approved.to_string()))
    );
    assert_eq!(
        order_client.fetch(approved).await.unwrap().status,
        OrderStatus::Approved
    );
    assert!(order_client.pending().await.unwrap().is_empty());

    user_mock.verify();
    plan_mock.verify();

    drop(order_client);
    actor_handle.await.unwrap();
}
