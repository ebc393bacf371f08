use chrono::NaiveDate;
use vehicle_core::db::open_db_in_memory;
use vehicle_core::{
    DateInputFormat, LaunchDateConfig, ServiceError, SqliteVehicleRepository, VehicleRepository,
    VehicleService,
};

#[test]
fn created_vehicle_can_be_fetched_with_identical_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = VehicleService::new(SqliteVehicleRepository::new(&conn));

    let created = service
        .create_vehicle("suv", "X5", "BMW", "2021-09-30")
        .unwrap();
    let id = created.id.expect("created vehicle should carry an id");

    let fetched = service.get_vehicle(id).unwrap().unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.kind, "suv");
    assert_eq!(fetched.model_code, "X5");
    assert_eq!(fetched.brand_name, "BMW");
    assert_eq!(
        fetched.launch_date,
        NaiveDate::from_ymd_opt(2021, 9, 30).unwrap()
    );
}

#[test]
fn invalid_launch_date_fails_without_persisting() {
    let conn = open_db_in_memory().unwrap();
    let service = VehicleService::new(SqliteVehicleRepository::new(&conn));

    let err = service
        .create_vehicle("suv", "X5", "BMW", "13/2020")
        .unwrap_err();
    match err {
        ServiceError::InvalidInput { field, value, .. } => {
            assert_eq!(field, "launchDate");
            assert_eq!(value, "13/2020");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(service.repository().count().unwrap(), 0);
}

#[test]
fn get_all_vehicles_with_zero_count_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let service = VehicleService::new(SqliteVehicleRepository::new(&conn));
    service
        .create_vehicle("car", "Golf", "VW", "2012-10-01")
        .unwrap();

    assert!(service.get_all_vehicles(0).unwrap().is_empty());
}

#[test]
fn get_all_vehicles_truncates_and_keeps_order() {
    let conn = open_db_in_memory().unwrap();
    let service = VehicleService::new(SqliteVehicleRepository::new(&conn));
    for model in ["A1", "A3", "A4"] {
        service
            .create_vehicle("car", model, "Audi", "2010-01-01")
            .unwrap();
    }

    let two = service.get_all_vehicles(2).unwrap();
    let models: Vec<_> = two.iter().map(|v| v.model_code.as_str()).collect();
    assert_eq!(models, ["A1", "A3"]);

    let all = service.get_all_vehicles(50).unwrap();
    assert_eq!(all.len(), 3);
}

#[test]
fn negative_count_is_invalid_input() {
    let conn = open_db_in_memory().unwrap();
    let service = VehicleService::new(SqliteVehicleRepository::new(&conn));

    let err = service.get_all_vehicles(-1).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput { field: "count", .. }));
}

#[test]
fn missing_vehicle_is_none() {
    let conn = open_db_in_memory().unwrap();
    let service = VehicleService::new(SqliteVehicleRepository::new(&conn));

    assert_eq!(service.get_vehicle(999).unwrap(), None);
}

#[test]
fn sequential_creations_get_increasing_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = VehicleService::new(SqliteVehicleRepository::new(&conn));

    let first = service
        .create_vehicle("car", "Model 3", "Tesla", "2017-07-28")
        .unwrap();
    let second = service
        .create_vehicle("car", "Model Y", "Tesla", "2020-03-13")
        .unwrap();

    assert!(second.id.unwrap() > first.id.unwrap());
}

#[test]
fn custom_date_pattern_is_honored() {
    let conn = open_db_in_memory().unwrap();
    let config = LaunchDateConfig {
        format: DateInputFormat::Pattern("%d.%m.%Y".to_string()),
        trim_input: true,
    };
    let service = VehicleService::with_date_config(SqliteVehicleRepository::new(&conn), config);

    let created = service
        .create_vehicle("car", "Corsa", "Opel", " 01.02.2019 ")
        .unwrap();
    assert_eq!(
        created.launch_date,
        NaiveDate::from_ymd_opt(2019, 2, 1).unwrap()
    );
}
