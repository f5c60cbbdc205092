//! Integration tests for cross-entity lifecycle behaviour:
//! project deletion cascades to units, customer deletion releases units.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use uuid::Uuid;

use ladrillo_core::customer::CreateCustomer;
use ladrillo_core::project::CreateProject;
use ladrillo_core::unit::{CreateUnit, UnitStatus, UnitType};
use ladrillo_db::ordering::Ordering;
use ladrillo_db::pagination::Page;
use ladrillo_db::repositories::unit_repo::UnitFilter;
use ladrillo_db::services::{CustomerService, ProjectService, UnitService};

fn new_project(name: &str) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        description: None,
        address: "123 Main St".to_string(),
        started_at: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
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
        phone: None,
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

fn sold_unit(project_id: Uuid, customer_id: Uuid, number: &str) -> CreateUnit {
    CreateUnit {
        customer_id: Some(customer_id),
        unit_status: Some(UnitStatus::Sold),
        reservation_deposit: Some(5_000),
        ..new_unit(project_id, number)
    }
}

#[sqlx::test]
async fn deleting_a_project_deletes_its_units(pool: SqlitePool) {
    let doomed = ProjectService::create(&pool, new_project("Doomed"))
        .await
        .unwrap();
    let survivor = ProjectService::create(&pool, new_project("Survivor"))
        .await
        .unwrap();

    UnitService::create(&pool, new_unit(doomed.id, "101"))
        .await
        .unwrap();
    UnitService::create(&pool, new_unit(doomed.id, "102"))
        .await
        .unwrap();
    let kept = UnitService::create(&pool, new_unit(survivor.id, "201"))
        .await
        .unwrap();

    assert!(ProjectService::delete(&pool, doomed.id).await.unwrap());

    let remaining = UnitService::list(
        &pool,
        &UnitFilter::default(),
        Ordering::default(),
        Page::default(),
    )
    .await
    .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, kept.id);
}

#[sqlx::test]
async fn deleting_a_customer_releases_their_units(pool: SqlitePool) {
    let project = ProjectService::create(&pool, new_project("Vista Mar"))
        .await
        .unwrap();
    let customer = CustomerService::create(&pool, new_customer("12345678", "maria@example.com"))
        .await
        .unwrap();

    let sold = UnitService::create(&pool, sold_unit(project.id, customer.id, "101"))
        .await
        .unwrap();
    let untouched = UnitService::create(&pool, new_unit(project.id, "102"))
        .await
        .unwrap();

    assert!(CustomerService::delete(&pool, customer.id).await.unwrap());

    // The unit survives, loses its customer, and reverts to Available so
    // it does not violate the customer/status pairing.
    let released = UnitService::get(&pool, sold.id).await.unwrap().unwrap();
    assert!(released.customer_id.is_none());
    assert_eq!(released.unit_status, UnitStatus::Available);

    let other = UnitService::get(&pool, untouched.id).await.unwrap().unwrap();
    assert_eq!(other.unit_status, UnitStatus::Available);
    assert!(other.customer_id.is_none());
}

#[sqlx::test]
async fn released_unit_can_be_resold(pool: SqlitePool) {
    let project = ProjectService::create(&pool, new_project("Vista Mar"))
        .await
        .unwrap();
    let first = CustomerService::create(&pool, new_customer("11111111", "a@example.com"))
        .await
        .unwrap();
    let unit = UnitService::create(&pool, sold_unit(project.id, first.id, "101"))
        .await
        .unwrap();

    CustomerService::delete(&pool, first.id).await.unwrap();

    let second = CustomerService::create(&pool, new_customer("22222222", "b@example.com"))
        .await
        .unwrap();
    let patch = ladrillo_core::unit::UpdateUnit {
        customer_id: Some(second.id),
        unit_status: Some(UnitStatus::Reserved),
        ..Default::default()
    };
    let resold = UnitService::partial_update(&pool, unit.id, patch)
        .await
        .unwrap();
    assert_eq!(resold.customer_id, Some(second.id));
    assert_eq!(resold.unit_status, UnitStatus::Reserved);
}
