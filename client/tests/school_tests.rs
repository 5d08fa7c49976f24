mod common;

use serde_json::json;

use client::ApiError;
use client::http::Query;
use shared::types::{CodigoEsquelaInput, CodigoTipo, EsquelaCreate};
use common::{MockBackend, memory_store, signed_in_backend};

fn esquela(id: i64) -> serde_json::Value {
    json!({
        "id_esquela": id,
        "fecha": "2024-05-02",
        "observaciones": "Ayudó a un compañero",
        "codigos": [
            {"id_codigo": 3, "tipo": "reconocimiento", "codigo": "R3", "descripcion": "Solidaridad"}
        ],
        "estudiante": {"id_estudiante": 12, "nombres": "Luis", "ci": "555"},
        "profesor": {"id_persona": 7, "nombre_completo": "Ana Rojas"}
    })
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_works_without_a_session() {
    let mock = MockBackend::start().await;
    mock.route("GET", "/health", 200, json!("ok"));
    mock.route("GET", "/status", 200, json!({"db": "up", "version": "1.4"}));
    let api = mock.api(memory_store());

    assert_eq!(api.health.check().await.unwrap(), "ok");
    let status = api.health.status().await.unwrap();
    assert_eq!(status["db"], "up");

    let sent = &mock.requests_to("GET", "/health")[0];
    assert_eq!(sent.authorization, None);
}

// ---------------------------------------------------------------------------
// Conduct notes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn esquela_list_passes_filters_and_reads_nested_records() {
    let (mock, api, _store) = signed_in_backend().await;
    mock.ok("GET", "/esquelas/", json!([esquela(1), esquela(2)]));

    let filters = Query::new().push("estudiante_id", 12).push("year", 2024);
    let notes = api.esquelas.list(&filters).await.unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].codigos[0].tipo, CodigoTipo::Reconocimiento);
    assert_eq!(notes[0].estudiante.as_ref().unwrap().id_estudiante, 12);
    assert!(notes[0].curso.is_none());

    let sent = &mock.requests_to("GET", "/esquelas/")[0];
    assert_eq!(sent.query.as_deref(), Some("estudiante_id=12&year=2024"));
    assert_eq!(sent.authorization.as_deref(), Some("Bearer T"));
}

#[tokio::test]
async fn esquela_create_omits_missing_teacher() {
    let (mock, api, _store) = signed_in_backend().await;
    mock.ok("POST", "/esquelas/", esquela(40));

    let data = EsquelaCreate {
        id_estudiante: 12,
        id_profesor: None,
        fecha: "2024-05-02".into(),
        observaciones: Some("Ayudó a un compañero".into()),
        codigos: vec![3, 4],
    };
    let created = api.esquelas.create(&data).await.unwrap();
    assert_eq!(created.id_esquela, 40);

    let body = mock.requests_to("POST", "/esquelas/")[0].json();
    assert_eq!(body["codigos"], json!([3, 4]));
    assert!(body.get("id_profesor").is_none());
}

#[tokio::test]
async fn missing_esquela_uses_its_own_message() {
    let (mock, api, _store) = signed_in_backend().await;

    let err = api.esquelas.get(99).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(ref m) if m == "conduct note not found"));

    mock.ok("DELETE", "/esquelas/5", json!("Esquela eliminada"));
    api.esquelas.delete(5).await.unwrap();
    assert_eq!(mock.requests_to("DELETE", "/esquelas/5").len(), 1);
}

#[tokio::test]
async fn aggregates_send_year_and_default_grouping() {
    let (mock, api, _store) = signed_in_backend().await;
    mock.ok("GET", "/esquelas/aggregate/by-course", json!([{"curso": "1A", "total": 4}]));
    mock.ok("GET", "/esquelas/aggregate/by-period", json!([{"periodo": "2024", "total": 9}]));

    api.esquelas.aggregate_by_course(Some(2024)).await.unwrap();
    api.esquelas.aggregate_by_course(None).await.unwrap();
    let by_period = api.esquelas.aggregate_by_period(None).await.unwrap();
    assert_eq!(by_period[0]["total"], 9);
    api.esquelas.aggregate_by_period(Some("month")).await.unwrap();

    let course = mock.requests_to("GET", "/esquelas/aggregate/by-course");
    assert_eq!(course[0].query.as_deref(), Some("year=2024"));
    assert_eq!(course[1].query, None);

    let period = mock.requests_to("GET", "/esquelas/aggregate/by-period");
    assert_eq!(period[0].query.as_deref(), Some("group_by=year"));
    assert_eq!(period[1].query.as_deref(), Some("group_by=month"));
}

#[tokio::test]
async fn student_esquelas_treat_null_as_empty() {
    let (mock, api, _store) = signed_in_backend().await;
    mock.ok("GET", "/students/12/esquelas", json!(null));

    let notes = api
        .esquelas
        .for_student(12, &Query::new().push("limit", 5))
        .await
        .unwrap();
    assert!(notes.is_empty());
    let sent = &mock.requests_to("GET", "/students/12/esquelas")[0];
    assert_eq!(sent.query.as_deref(), Some("limit=5"));
}

// ---------------------------------------------------------------------------
// Conduct codes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn code_list_filters_by_kind() {
    let (mock, api, _store) = signed_in_backend().await;
    mock.ok(
        "GET",
        "/codigos-esquelas/",
        json!([{"id_codigo": 1, "tipo": "orientacion", "codigo": "O1", "descripcion": "Atrasos"}]),
    );

    let codes = api.codes.list(Some(CodigoTipo::Orientacion)).await.unwrap();
    assert_eq!(codes[0].codigo, "O1");
    api.codes.list(None).await.unwrap();

    let sent = mock.requests_to("GET", "/codigos-esquelas/");
    assert_eq!(sent[0].query.as_deref(), Some("tipo=orientacion"));
    assert_eq!(sent[1].query, None);
}

#[tokio::test]
async fn duplicate_code_is_a_conflict() {
    let (mock, api, _store) = signed_in_backend().await;
    mock.route(
        "POST",
        "/codigos-esquelas/",
        409,
        json!({"detail": "duplicate key"}),
    );
    mock.ok(
        "PUT",
        "/codigos-esquelas/1",
        json!({"id_codigo": 1, "tipo": "reconocimiento", "codigo": "R1", "descripcion": "Puntualidad"}),
    );

    let input = CodigoEsquelaInput {
        tipo: CodigoTipo::Reconocimiento,
        codigo: "R1".into(),
        descripcion: "Puntualidad".into(),
    };
    let err = api.codes.create(&input).await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    let updated = api.codes.update(1, &input).await.unwrap();
    assert_eq!(updated.descripcion, "Puntualidad");
    let body = mock.requests_to("PUT", "/codigos-esquelas/1")[0].json();
    assert_eq!(body["tipo"], "reconocimiento");
}

// ---------------------------------------------------------------------------
// Directories and courses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn directories_read_students_teachers_and_registrars() {
    let (mock, api, _store) = signed_in_backend().await;
    mock.ok(
        "GET",
        "/estudiantes/",
        json!([{"id_estudiante": 12, "nombres": "Luis", "fecha_nacimiento": "2012-03-01"}]),
    );
    mock.ok("GET", "/profesores/7", json!({"id_persona": 7, "nombre_completo": "Ana Rojas"}));
    mock.ok("GET", "/registradores/", json!(null));

    let students = api.staff.students().await.unwrap();
    assert_eq!(students[0].fecha_nacimiento.as_deref(), Some("2012-03-01"));
    let teacher = api.staff.teacher(7).await.unwrap();
    assert_eq!(teacher.nombre_completo.as_deref(), Some("Ana Rojas"));
    assert!(api.staff.registrars().await.unwrap().is_empty());

    let err = api.staff.student(404).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(ref m) if m == "student not found"));
}

#[tokio::test]
async fn course_rosters_pass_filters() {
    let (mock, api, _store) = signed_in_backend().await;
    mock.ok("GET", "/courses/", json!([{"id_curso": 1, "nombre_curso": "1A"}]));
    mock.ok("GET", "/courses/mis_cursos/7", json!([{"id_curso": 1}]));
    mock.ok("GET", "/courses/1/students", json!([{"id_estudiante": 12}]));
    mock.ok("GET", "/courses/1/teachers", json!([]));

    assert_eq!(api.courses.list().await.unwrap().len(), 1);
    assert_eq!(api.courses.teacher_courses(7).await.unwrap().len(), 1);
    let roster = api
        .courses
        .students(1, &Query::new().push("gestion", 2024))
        .await
        .unwrap();
    assert_eq!(roster[0]["id_estudiante"], 12);
    assert!(api.courses.teachers(1, &Query::new()).await.unwrap().is_empty());

    let sent = &mock.requests_to("GET", "/courses/1/students")[0];
    assert_eq!(sent.query.as_deref(), Some("gestion=2024"));
    assert_eq!(mock.requests_to("GET", "/courses/1/teachers")[0].query, None);

    let err = api.courses.get(3).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(ref m) if m == "course not found"));
}

#[tokio::test]
async fn ranking_passes_filters_through() {
    let (mock, api, _store) = signed_in_backend().await;
    mock.ok("GET", "/reports/ranking", json!([{"estudiante": "Luis", "puntos": 8}]));

    let ranking = api
        .reports
        .ranking(&Query::new().push("tipo", "reconocimiento").push("limit", 10))
        .await
        .unwrap();
    assert_eq!(ranking[0]["puntos"], 8);

    let sent = &mock.requests_to("GET", "/reports/ranking")[0];
    assert_eq!(sent.query.as_deref(), Some("tipo=reconocimiento&limit=10"));
}
