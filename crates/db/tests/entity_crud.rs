//! Integration tests for entity CRUD through the service layer.
//!
//! Exercises the full stack against a real database:
//! - Create / get / update / partial update / delete per entity
//! - Default ordering and pagination
//! - List filters

use assert_matches::assert_matches;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use uuid::Uuid;

use ladrillo_core::customer::CreateCustomer;
use ladrillo_core::error::CoreError;
use ladrillo_core::project::{CreateProject, ProjectStatus, UpdateProject};
use ladrillo_core::unit::{CreateUnit, UnitStatus, UnitType, UpdateUnit};
use ladrillo_db::ordering::{parse_ordering, Ordering};
use ladrillo_db::pagination::Page;
use ladrillo_db::repositories::customer_repo::CustomerFilter;
use ladrillo_db::repositories::project_repo::ProjectFilter;
use ladrillo_db::repositories::unit_repo::UnitFilter;
use ladrillo_db::repositories::ProjectRepo;
use ladrillo_db::services::{CustomerService, ProjectService, ServiceError, UnitService};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_project(name: &str) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        description: None,
        address: "123 Main St".to_string(),
        started_at: date(2024, 1, 15),
        finished_at: None,
        status: None,
    }
}

fn new_customer(rut: &str, email: &str) -> CreateCustomer {
    CreateCustomer {
        rut: rut.to_string(),
        name: "Maria".to_string(),
        lastname: "Gonzalez".to_string(),
        email: email.to_string(),
        phone: Some("+56912345678".to_string()),
    }
}

fn new_unit(project_id: Uuid, number: &str) -> CreateUnit {
    CreateUnit {
        project_id,
        customer_id: None,
        unit_number: number.to_string(),
        unit_type: UnitType::Apartment,
        square_meters: 75.5,
        price: 120_000,
        reservation_deposit: None,
        unit_status: None,
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn project_create_and_get(pool: SqlitePool) {
    let created = ProjectService::create(&pool, new_project("Vista Mar"))
        .await
        .unwrap();
    assert_eq!(created.name, "Vista Mar");
    assert_eq!(created.status, ProjectStatus::OffPlan);
    assert!(created.finished_at.is_none());

    let fetched = ProjectService::get(&pool, created.id).await.unwrap();
    assert_eq!(fetched.unwrap().id, created.id);
}

#[sqlx::test]
async fn project_get_missing_returns_none(pool: SqlitePool) {
    let fetched = ProjectService::get(&pool, Uuid::new_v4()).await.unwrap();
    assert!(fetched.is_none());
}

#[sqlx::test]
async fn project_full_update_replaces_all_fields(pool: SqlitePool) {
    let created = ProjectService::create(&pool, new_project("Vista Mar"))
        .await
        .unwrap();

    let mut replacement = new_project("Vista Mar II");
    replacement.description = Some("Second phase".to_string());
    replacement.status = Some(ProjectStatus::UnderConstruction);
    let updated = ProjectService::update(&pool, created.id, replacement)
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Vista Mar II");
    assert_eq!(updated.status, ProjectStatus::UnderConstruction);
    assert_eq!(updated.created_at, created.created_at);
}

#[sqlx::test]
async fn project_full_update_clears_omitted_optionals(pool: SqlitePool) {
    let mut input = new_project("Vista Mar");
    input.description = Some("Phase one".to_string());
    let created = ProjectService::create(&pool, input).await.unwrap();
    assert!(created.description.is_some());

    let updated = ProjectService::update(&pool, created.id, new_project("Vista Mar"))
        .await
        .unwrap();
    assert!(updated.description.is_none());
}

#[sqlx::test]
async fn project_partial_update_preserves_unspecified_fields(pool: SqlitePool) {
    let mut input = new_project("Vista Mar");
    input.description = Some("Phase one".to_string());
    let created = ProjectService::create(&pool, input).await.unwrap();

    let patch = UpdateProject {
        name: Some("Vista Mar Renovado".to_string()),
        ..Default::default()
    };
    let updated = ProjectService::partial_update(&pool, created.id, patch)
        .await
        .unwrap();

    assert_eq!(updated.name, "Vista Mar Renovado");
    assert_eq!(updated.description.as_deref(), Some("Phase one"));
    assert_eq!(updated.address, created.address);
}

#[sqlx::test]
async fn project_update_missing_is_not_found(pool: SqlitePool) {
    let err = ProjectService::update(&pool, Uuid::new_v4(), new_project("Ghost"))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        ServiceError::Core(CoreError::NotFound {
            entity: "Project",
            ..
        })
    );
}

#[sqlx::test]
async fn project_delete_and_delete_missing(pool: SqlitePool) {
    let created = ProjectService::create(&pool, new_project("Vista Mar"))
        .await
        .unwrap();

    assert!(ProjectService::delete(&pool, created.id).await.unwrap());
    assert!(ProjectService::get(&pool, created.id)
        .await
        .unwrap()
        .is_none());
    assert!(!ProjectService::delete(&pool, created.id).await.unwrap());
}

#[sqlx::test]
async fn updating_a_vanished_row_matches_nothing(pool: SqlitePool) {
    let created = ProjectService::create(&pool, new_project("Vista Mar"))
        .await
        .unwrap();
    let stale = ProjectService::get(&pool, created.id).await.unwrap().unwrap();
    assert!(ProjectService::delete(&pool, created.id).await.unwrap());

    // A row can disappear between a service's read and its write; the
    // repository must report the miss so the service surfaces NotFound
    // instead of echoing the in-memory value as a success.
    assert!(!ProjectRepo::update(&pool, &stale).await.unwrap());
}

#[sqlx::test]
async fn project_list_default_order_is_newest_first(pool: SqlitePool) {
    // Space the inserts so each row gets a distinct created_at.
    for name in ["First", "Second", "Third"] {
        ProjectService::create(&pool, new_project(name))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let projects = ProjectService::list(
        &pool,
        &ProjectFilter::default(),
        Ordering::default(),
        Page::default(),
    )
    .await
    .unwrap();

    let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Third", "Second", "First"]);
}

#[sqlx::test]
async fn project_list_filters_by_name_substring_and_status(pool: SqlitePool) {
    ProjectService::create(&pool, new_project("Vista Mar"))
        .await
        .unwrap();
    let mut finished = new_project("Vista Cordillera");
    finished.finished_at = Some(date(2024, 6, 1));
    ProjectService::create(&pool, finished).await.unwrap();
    ProjectService::create(&pool, new_project("Parque Central"))
        .await
        .unwrap();

    let filter = ProjectFilter {
        name: Some("vista".to_string()),
        ..Default::default()
    };
    let matched = ProjectService::list(&pool, &filter, Ordering::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(matched.len(), 2);

    let filter = ProjectFilter {
        status: Some(ProjectStatus::Finished),
        ..Default::default()
    };
    let matched = ProjectService::list(&pool, &filter, Ordering::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name, "Vista Cordillera");
}

#[sqlx::test]
async fn project_list_respects_limit_and_offset(pool: SqlitePool) {
    for i in 0..5 {
        ProjectService::create(&pool, new_project(&format!("Project {i}")))
            .await
            .unwrap();
    }

    let page = Page {
        limit: Some(2),
        offset: Some(1),
    };
    let projects = ProjectService::list(
        &pool,
        &ProjectFilter::default(),
        Ordering::default(),
        page,
    )
    .await
    .unwrap();
    assert_eq!(projects.len(), 2);
}

#[sqlx::test]
async fn project_list_honors_explicit_ordering(pool: SqlitePool) {
    let mut early = new_project("Early");
    early.started_at = date(2023, 1, 1);
    ProjectService::create(&pool, early).await.unwrap();
    let mut late = new_project("Late");
    late.started_at = date(2025, 1, 1);
    ProjectService::create(&pool, late).await.unwrap();

    let order = parse_ordering("started_at").unwrap();
    let projects = ProjectService::list(&pool, &ProjectFilter::default(), order, Page::default())
        .await
        .unwrap();
    assert_eq!(projects[0].name, "Early");

    let order = parse_ordering("-started_at").unwrap();
    let projects = ProjectService::list(&pool, &ProjectFilter::default(), order, Page::default())
        .await
        .unwrap();
    assert_eq!(projects[0].name, "Late");
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn customer_crud_round_trip(pool: SqlitePool) {
    let created = CustomerService::create(&pool, new_customer("12345678", "maria@example.com"))
        .await
        .unwrap();
    assert_eq!(created.rut, "12345678");

    let fetched = CustomerService::get(&pool, created.id).await.unwrap();
    assert_eq!(fetched.unwrap().email, "maria@example.com");

    let patch = ladrillo_core::customer::UpdateCustomer {
        lastname: Some("Soto".to_string()),
        ..Default::default()
    };
    let updated = CustomerService::partial_update(&pool, created.id, patch)
        .await
        .unwrap();
    assert_eq!(updated.lastname, "Soto");
    assert_eq!(updated.name, "Maria");

    assert!(CustomerService::delete(&pool, created.id).await.unwrap());
    assert!(CustomerService::get(&pool, created.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test]
async fn customer_list_exact_and_substring_filters(pool: SqlitePool) {
    CustomerService::create(&pool, new_customer("11111111", "a@example.com"))
        .await
        .unwrap();
    let mut other = new_customer("22222222", "b@example.com");
    other.lastname = "Martinez".to_string();
    CustomerService::create(&pool, other).await.unwrap();

    let filter = CustomerFilter {
        rut: Some("11111111".to_string()),
        ..Default::default()
    };
    let matched = CustomerService::list(&pool, &filter, Ordering::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].email, "a@example.com");

    let filter = CustomerFilter {
        lastname: Some("mart".to_string()),
        ..Default::default()
    };
    let matched = CustomerService::list(&pool, &filter, Ordering::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].rut, "22222222");
}

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn unit_create_applies_defaults(pool: SqlitePool) {
    let project = ProjectService::create(&pool, new_project("Vista Mar"))
        .await
        .unwrap();

    let unit = UnitService::create(&pool, new_unit(project.id, "101"))
        .await
        .unwrap();
    assert_eq!(unit.unit_status, UnitStatus::Available);
    assert_eq!(unit.reservation_deposit, 0);
    assert!(unit.customer_id.is_none());
}

#[sqlx::test]
async fn unit_partial_update_assigns_customer(pool: SqlitePool) {
    let project = ProjectService::create(&pool, new_project("Vista Mar"))
        .await
        .unwrap();
    let customer = CustomerService::create(&pool, new_customer("12345678", "maria@example.com"))
        .await
        .unwrap();
    let unit = UnitService::create(&pool, new_unit(project.id, "101"))
        .await
        .unwrap();

    let patch = UpdateUnit {
        customer_id: Some(customer.id),
        unit_status: Some(UnitStatus::Reserved),
        ..Default::default()
    };
    let updated = UnitService::partial_update(&pool, unit.id, patch)
        .await
        .unwrap();
    assert_eq!(updated.customer_id, Some(customer.id));
    assert_eq!(updated.unit_status, UnitStatus::Reserved);
}

#[sqlx::test]
async fn unit_list_filters_by_project_and_status(pool: SqlitePool) {
    let first = ProjectService::create(&pool, new_project("First"))
        .await
        .unwrap();
    let second = ProjectService::create(&pool, new_project("Second"))
        .await
        .unwrap();

    UnitService::create(&pool, new_unit(first.id, "101"))
        .await
        .unwrap();
    UnitService::create(&pool, new_unit(first.id, "102"))
        .await
        .unwrap();
    UnitService::create(&pool, new_unit(second.id, "201"))
        .await
        .unwrap();

    let filter = UnitFilter {
        project_id: Some(first.id),
        ..Default::default()
    };
    let matched = UnitService::list(&pool, &filter, Ordering::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(matched.len(), 2);

    let filter = UnitFilter {
        unit_status: Some(UnitStatus::Sold),
        ..Default::default()
    };
    let matched = UnitService::list(&pool, &filter, Ordering::default(), Page::default())
        .await
        .unwrap();
    assert!(matched.is_empty());
}

#[sqlx::test]
async fn unit_list_orders_by_price(pool: SqlitePool) {
    let project = ProjectService::create(&pool, new_project("Vista Mar"))
        .await
        .unwrap();
    for (number, price) in [("101", 200_000), ("102", 100_000), ("103", 300_000)] {
        let mut input = new_unit(project.id, number);
        input.price = price;
        UnitService::create(&pool, input).await.unwrap();
    }

    let order = parse_ordering("price").unwrap();
    let units = UnitService::list(&pool, &UnitFilter::default(), order, Page::default())
        .await
        .unwrap();
    let prices: Vec<i64> = units.iter().map(|u| u.price).collect();
    assert_eq!(prices, vec![100_000, 200_000, 300_000]);
}
