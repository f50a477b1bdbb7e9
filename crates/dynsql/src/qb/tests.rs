//! Integration tests for the qb module.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::condition::*;
use crate::criterion::{Criterion, or};
use crate::error::SqlError;
use crate::qb::expr::{count_all, max, sort_by_alias};
use crate::qb::select::equal_to;
use crate::qb::{
    DeleteModel, QueryExpressionFinisher, QueryExpressionStage, Renderable, StatementKind,
    WhereBuilder, count_from, delete_from, delete_from_with, insert_into, insert_multiple, select,
    select_distinct, select_with, update,
};
use crate::render::RenderConfig;
use crate::render::strategy::RenderingStrategies;
use crate::table::{Column, DataType, Table};
use crate::value::Value;

struct Schema {
    person: Table,
    id: Column<i32>,
    first_name: Column<String>,
    last_name: Column<String>,
    employed: Column<bool>,
}

fn schema() -> Schema {
    let person = Table::new("person");
    Schema {
        id: person.column("id", DataType::Integer),
        first_name: person.column("first_name", DataType::Varchar),
        last_name: person.column("last_name", DataType::Varchar),
        employed: person.column("employed", DataType::Boolean),
        person,
    }
}

#[test]
fn test_select_basic() {
    let s = schema();
    let stmt = select((&s.id, &s.first_name))
        .from(&s.person)
        .build()
        .unwrap()
        .to_statement();
    assert_eq!(stmt.sql(), "select id, first_name from person");
    assert!(stmt.parameters().is_empty());
    assert_eq!(stmt.kind(), StatementKind::Select);
}

#[test]
fn test_select_with_conditions() {
    let s = schema();
    let stmt = select(&s.id)
        .from(&s.person)
        .where_(&s.id, is_greater_than(10))
        .and(&s.employed, is_equal_to(true))
        .or(&s.last_name, is_null())
        .build()
        .unwrap()
        .to_statement();

    assert_eq!(
        stmt.sql(),
        "select id from person where id > $1 and employed = $2 or last_name is null"
    );
    assert_eq!(stmt.parameters().get("p1"), Some(&Value::Int(10)));
    assert_eq!(stmt.parameters().get("p2"), Some(&Value::Bool(true)));
}

#[test]
fn test_select_distinct_order_by() {
    let s = schema();
    let stmt = select_distinct(&s.last_name)
        .from(&s.person)
        .order_by((s.last_name.descending(), &s.id))
        .build()
        .unwrap()
        .to_statement();
    assert_eq!(
        stmt.sql(),
        "select distinct last_name from person order by last_name desc, id"
    );
}

#[test]
fn test_select_column_alias_orders_by_alias() {
    let s = schema();
    let surname = s.last_name.clone().with_alias("surname");
    let stmt = select((&s.id, &surname))
        .from(&s.person)
        .order_by((&surname, sort_by_alias("id").descending()))
        .build()
        .unwrap()
        .to_statement();
    assert_eq!(
        stmt.sql(),
        "select id, last_name as surname from person order by surname, id desc"
    );
}

#[test]
fn test_select_nested_group() {
    let s = schema();
    let stmt = select(&s.id)
        .from(&s.person)
        .where_(&s.id, is_equal_to(5))
        .and_with(
            &s.first_name,
            is_equal_to("x"),
            vec![or(&s.first_name, is_equal_to("y"))],
        )
        .build()
        .unwrap()
        .render(&RenderConfig::numbered());

    assert_eq!(
        stmt.sql(),
        "select id from person where id = ?1 and (first_name = ?2 or first_name = ?3)"
    );
    assert_eq!(stmt.parameters().keys().collect::<Vec<_>>(), vec!["1", "2", "3"]);
}

#[test]
fn test_select_empty_in_list_drops_where() {
    let s = schema();
    let stmt = select(&s.id)
        .from(&s.person)
        .where_(&s.id, is_in(Vec::<i32>::new()))
        .build()
        .unwrap()
        .to_statement();
    assert_eq!(stmt.sql(), "select id from person");
    assert!(stmt.parameters().is_empty());
}

#[test]
fn test_select_optional_filters() {
    let s = schema();
    let first: Option<&str> = None;
    let last: Option<&str> = Some("Flintstone");

    let stmt = select(&s.id)
        .from(&s.person)
        .where_(&s.first_name, is_equal_to_when_present(first))
        .and(&s.last_name, is_equal_to_when_present(last))
        .and(&s.id, is_greater_than(0).when(|| false))
        .build()
        .unwrap()
        .to_statement();

    assert_eq!(stmt.sql(), "select id from person where last_name = $1");
    assert_eq!(stmt.parameters().get("p1"), Some(&Value::from("Flintstone")));
}

#[test]
fn test_select_join_with_aliases() {
    let order = Table::new("orders");
    let order_id = order.column::<i32>("id", DataType::Integer);
    let person_id = order.column::<i32>("person_id", DataType::Integer);
    let s = schema();

    let stmt = select((&s.first_name, &order_id))
        .from_as(&s.person, "p")
        .join_as(&order, "o")
        .on(&person_id, equal_to(&s.id))
        .where_(&order_id, is_less_than(100))
        .build()
        .unwrap()
        .to_statement();

    assert_eq!(
        stmt.sql(),
        "select p.first_name, o.id from person p join orders o on o.person_id = p.id where o.id < $1"
    );
}

#[test]
fn test_select_left_join_multiple_conditions() {
    let address = Table::new("address");
    let address_person = address.column::<i32>("person_id", DataType::Integer);
    let address_last = address.column::<String>("last_name", DataType::Varchar);
    let s = schema();

    let stmt = select(&s.id)
        .from(&s.person)
        .left_join(&address)
        .on(&address_person, equal_to(&s.id))
        .and(&address_last, equal_to(&s.last_name))
        .build()
        .unwrap()
        .to_statement();

    assert_eq!(
        stmt.sql(),
        "select id from person left join address on person_id = id and last_name = last_name"
    );
}

#[test]
fn test_select_group_by() {
    let s = schema();
    let stmt = select((&s.last_name, count_all().as_("n")))
        .from(&s.person)
        .where_(&s.employed, is_equal_to(true))
        .group_by(&s.last_name)
        .order_by(sort_by_alias("n").descending())
        .build()
        .unwrap()
        .to_statement();
    assert_eq!(
        stmt.sql(),
        "select last_name, count(*) as n from person where employed = $1 group by last_name order by n desc"
    );
}

#[test]
fn test_count_from() {
    let s = schema();
    let stmt = count_from(&s.person)
        .where_(&s.employed, is_equal_to(false))
        .build()
        .unwrap()
        .to_statement();
    assert_eq!(stmt.sql(), "select count(*) from person where employed = $1");
}

#[test]
fn test_union_shares_sequence() {
    let s = schema();
    let stmt = select(&s.id)
        .from(&s.person)
        .where_(&s.id, is_equal_to(1))
        .union()
        .select(&s.id)
        .from(&s.person)
        .where_(&s.id, is_equal_to(2))
        .union_all()
        .select(&s.id)
        .from(&s.person)
        .order_by(&s.id)
        .build()
        .unwrap()
        .to_statement();

    assert_eq!(
        stmt.sql(),
        "select id from person where id = $1 union select id from person where id = $2 \
         union all select id from person order by id"
    );
    assert_eq!(stmt.parameters().len(), 2);
}

#[test]
fn test_limit_offset() {
    let s = schema();
    let stmt = select(&s.id)
        .from(&s.person)
        .where_(&s.employed, is_equal_to(true))
        .limit(10)
        .offset(5)
        .build()
        .unwrap()
        .to_statement();

    assert_eq!(
        stmt.sql(),
        "select id from person where employed = $1 limit $2 offset $3"
    );
    assert_eq!(stmt.parameters().get("p2"), Some(&Value::Int(10)));
    assert_eq!(stmt.parameters().get("p3"), Some(&Value::Int(5)));
}

#[test]
fn test_offset_fetch_first() {
    let s = schema();
    let stmt = select(&s.id)
        .from(&s.person)
        .order_by(&s.id)
        .offset(20)
        .fetch_first(10)
        .rows_only()
        .build()
        .unwrap()
        .to_statement();

    assert_eq!(
        stmt.sql(),
        "select id from person order by id offset $1 rows fetch first $2 rows only"
    );
    assert_eq!(stmt.parameters().get("p1"), Some(&Value::Int(20)));
    assert_eq!(stmt.parameters().get("p2"), Some(&Value::Int(10)));
}

#[test]
fn test_fetch_first_alone() {
    let s = schema();
    let stmt = select(&s.id)
        .from(&s.person)
        .fetch_first(3)
        .rows_only()
        .build()
        .unwrap()
        .to_statement();
    assert_eq!(stmt.sql(), "select id from person fetch first $1 rows only");
}

#[test]
fn test_offset_alone() {
    let s = schema();
    let stmt = select(&s.id)
        .from(&s.person)
        .offset(7)
        .build()
        .unwrap()
        .to_statement();
    assert_eq!(stmt.sql(), "select id from person offset $1 rows");
}

#[test]
fn test_exists_subquery_shares_sequence() {
    let s = schema();
    let address = Table::new("address");
    let address_person = address.column::<i32>("person_id", DataType::Integer);
    let city = address.column::<String>("city", DataType::Varchar);

    let sub = select(&address_person)
        .from_as(&address, "a")
        .where_(&address_person, is_equal_to_column(&s.id))
        .and(&city, is_equal_to("Bedrock"))
        .build()
        .unwrap();

    let stmt = select(&s.id)
        .from_as(&s.person, "p")
        .where_(&s.employed, is_equal_to(true))
        .and_exists(sub)
        .and(&s.id, is_less_than(50))
        .build()
        .unwrap()
        .to_statement();

    assert_eq!(
        stmt.sql(),
        "select p.id from person p where p.employed = $1 and exists \
         (select a.person_id from address a where a.person_id = p.id and a.city = $2) and p.id < $3"
    );
    assert_eq!(stmt.parameters().len(), 3);
    assert_eq!(stmt.parameters().get("p2"), Some(&Value::from("Bedrock")));
}

#[test]
fn test_where_not_exists() {
    let s = schema();
    let other = Table::new("blocked");
    let blocked_id = other.column::<i32>("person_id", DataType::Integer);
    let sub = select(&blocked_id).from(&other).build().unwrap();

    let stmt = select(&s.id)
        .from(&s.person)
        .where_criterion(crate::criterion::not_exists(sub))
        .build()
        .unwrap()
        .to_statement();
    assert_eq!(
        stmt.sql(),
        "select id from person where not exists (select person_id from blocked)"
    );
}

#[test]
fn test_where_criterion_group_head_promotion() {
    let s = schema();
    let closed: Option<i32> = None;
    let group = Criterion::new(&s.id, is_equal_to_when_present(closed))
        .and(&s.first_name, is_equal_to("a"))
        .or(&s.first_name, is_equal_to("b"));

    let stmt = select(&s.id)
        .from(&s.person)
        .where_(&s.employed, is_equal_to(true))
        .or_criterion(group)
        .build()
        .unwrap()
        .to_statement();
    assert_eq!(
        stmt.sql(),
        "select id from person where employed = $1 or (first_name = $2 or first_name = $3)"
    );
}

#[test]
fn test_select_empty_list_is_error() {
    let s = schema();
    let err = select(Vec::<&Column<i32>>::new())
        .from(&s.person)
        .build()
        .unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_select_adapter() {
    let s = schema();
    let sql = select_with(|m| m.to_statement().sql().to_string(), &s.id)
        .from(&s.person)
        .limit(1)
        .build()
        .unwrap();
    assert_eq!(sql, "select id from person limit $1");
}

#[test]
fn test_delete_without_where() {
    let s = schema();
    let stmt = delete_from(&s.person).build().to_statement();
    assert_eq!(stmt.sql(), "delete from person");
    assert!(stmt.parameters().is_empty());
    assert_eq!(stmt.kind(), StatementKind::Delete);
}

#[test]
fn test_delete_with_where() {
    let s = schema();
    let stmt = delete_from(&s.person)
        .where_(&s.id, is_between(1, 10))
        .or(&s.last_name, is_like("Rub%"))
        .build()
        .to_statement();
    assert_eq!(
        stmt.sql(),
        "delete from person where id between $1 and $2 or last_name like $3"
    );
}

#[test]
fn test_delete_adapter_receives_model() {
    let s = schema();
    let count = delete_from_with(|m: DeleteModel| m.where_model().criteria().len(), &s.person)
        .where_(&s.id, is_equal_to(1))
        .and(&s.id, is_not_equal_to(2))
        .build();
    assert_eq!(count, 2);
}

#[test]
fn test_insert_general() {
    let s = schema();
    let stmt = insert_into(&s.person)
        .set(&s.id)
        .to_value(22)
        .set(&s.first_name)
        .to_value_or_null(None::<&str>)
        .set(&s.last_name)
        .to_string_constant("Rubble")
        .set(&s.employed)
        .to_constant("true")
        .build()
        .unwrap()
        .to_statement();

    assert_eq!(
        stmt.sql(),
        "insert into person (id, first_name, last_name, employed) values ($1, null, 'Rubble', true)"
    );
    assert_eq!(stmt.parameters().len(), 1);
    assert_eq!(stmt.kind(), StatementKind::Insert);
}

#[test]
fn test_insert_when_present_omits_mapping() {
    let s = schema();
    let stmt = insert_into(&s.person)
        .set(&s.id)
        .to_value(1)
        .set(&s.first_name)
        .to_value_when_present(None::<String>)
        .set(&s.last_name)
        .to_value_when_present(Some("Slate"))
        .build()
        .unwrap()
        .to_statement();
    assert_eq!(stmt.sql(), "insert into person (id, last_name) values ($1, $2)");
}

#[test]
fn test_insert_without_mappings_is_error() {
    let s = schema();
    let err = insert_into(&s.person)
        .set(&s.first_name)
        .to_value_when_present(None::<String>)
        .build()
        .unwrap_err();
    assert!(matches!(err, SqlError::InvalidArgument { field: "insert mappings" }));
}

#[test]
fn test_insert_multiple_with_returning() {
    struct NewPerson {
        first: &'static str,
        last: &'static str,
    }

    let s = schema();
    let records = vec![
        NewPerson { first: "Fred", last: "Flintstone" },
        NewPerson { first: "Barney", last: "Rubble" },
    ];

    let stmt = insert_multiple(records)
        .into_table(&s.person)
        .map(&s.first_name)
        .to_property(|r: &NewPerson| r.first)
        .map(&s.last_name)
        .to_property(|r: &NewPerson| r.last)
        .map(&s.employed)
        .to_constant("false")
        .returning(&s.id)
        .build()
        .unwrap()
        .to_statement();

    assert_eq!(
        stmt.sql(),
        "insert into person (first_name, last_name, employed) values ($1, $2, false), ($3, $4, false) returning id"
    );
    assert_eq!(stmt.parameters().get("p3"), Some(&Value::from("Barney")));
    assert_eq!(stmt.kind(), StatementKind::InsertMultiple);
    assert_eq!(stmt.generated_key().unwrap(), "id");
}

#[test]
fn test_insert_multiple_empty_records_is_error() {
    let s = schema();
    let err = insert_multiple(Vec::<i32>::new())
        .into_table(&s.person)
        .map(&s.id)
        .to_property(|r: &i32| *r)
        .build()
        .unwrap_err();
    assert!(matches!(err, SqlError::InvalidArgument { field: "records" }));
}

#[test]
fn test_generated_key_errors() {
    let s = schema();
    let none = insert_multiple(vec![1])
        .into_table(&s.person)
        .map(&s.id)
        .to_property(|r: &i32| *r)
        .build()
        .unwrap()
        .to_statement();
    assert!(matches!(none.generated_key(), Err(SqlError::MissingGeneratedKey)));

    let two = insert_multiple(vec![1])
        .into_table(&s.person)
        .map(&s.first_name)
        .to_string_constant("x")
        .returning(&s.id)
        .returning(&s.last_name)
        .build()
        .unwrap()
        .to_statement();
    let err = two.generated_key().unwrap_err();
    assert!(err.is_generated_key());
}

#[test]
fn test_update_basic() {
    let s = schema();
    let stmt = update(&s.person)
        .set(&s.first_name)
        .equal_to("Wilma")
        .set(&s.last_name)
        .equal_to_null()
        .where_(&s.id, is_equal_to(3))
        .build()
        .unwrap()
        .to_statement();

    assert_eq!(
        stmt.sql(),
        "update person set first_name = $1, last_name = null where id = $2"
    );
    assert_eq!(stmt.kind(), StatementKind::Update);
}

#[test]
fn test_update_optional_values_and_column() {
    let s = schema();
    let stmt = update(&s.person)
        .set(&s.first_name)
        .equal_to_when_present(None::<String>)
        .set(&s.last_name)
        .equal_to_column(&s.first_name)
        .set(&s.employed)
        .equal_to_or_null(None::<bool>)
        .build()
        .unwrap()
        .to_statement();
    assert_eq!(
        stmt.sql(),
        "update person set last_name = first_name, employed = null"
    );
}

#[test]
fn test_update_without_set_is_error() {
    let s = schema();
    let err = update(&s.person)
        .where_(&s.id, is_equal_to(1))
        .build()
        .unwrap_err();
    assert!(matches!(err, SqlError::InvalidArgument { field: "set clause" }));
}

#[test]
fn test_mybatis_strategy() {
    let s = schema();
    let stmt = select(&s.id)
        .from(&s.person)
        .where_(&s.id, is_equal_to(4))
        .and(&s.first_name, is_in(["a", "b"]))
        .build()
        .unwrap()
        .render(&RenderConfig::mybatis());

    assert_eq!(
        stmt.sql(),
        "select id from person where id = #{parameters.p1,jdbcType=INTEGER} \
         and first_name in (#{parameters.p2,jdbcType=VARCHAR},#{parameters.p3,jdbcType=VARCHAR})"
    );
    assert!(stmt.parameters().contains_key("p3"));
}

#[test]
fn test_column_strategy_override() {
    let doc_table = Table::new("docs");
    let id = doc_table.column::<i64>("id", DataType::BigInt);
    let body = doc_table
        .column::<serde_json::Value>("body", DataType::Jsonb)
        .with_rendering_strategy(RenderingStrategies::postgres_json());

    let stmt = update(&doc_table)
        .set(&body)
        .equal_to(serde_json::json!({"a": 1}))
        .where_(&id, is_equal_to(9i64))
        .build()
        .unwrap()
        .to_statement();

    assert_eq!(stmt.sql(), "update docs set body = $1::jsonb where id = $2");
}

#[test]
fn test_named_strategy_with_prefix() {
    let s = schema();
    let config = RenderConfig::named().parameter_prefix("arg");
    let stmt = delete_from(&s.person)
        .where_(&s.id, is_equal_to(1))
        .build()
        .render(&config);
    assert_eq!(stmt.sql(), "delete from person where id = :arg1");
    assert!(stmt.parameters().contains_key("arg1"));
}

#[test]
fn test_empty_callback_fires_per_render() {
    let s = schema();
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();

    let model = select(&s.id)
        .from(&s.person)
        .where_(
            &s.id,
            is_in(Vec::<i32>::new()).with_list_empty_callback(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .build()
        .unwrap();

    let first = model.to_statement();
    let second = model.to_statement();
    assert_eq!(first.sql(), second.sql());
    assert_eq!(fired.load(Ordering::SeqCst), 2);
}

#[test]
fn test_rerender_is_identical() {
    let s = schema();
    let model = select((&s.id, &s.first_name))
        .from(&s.person)
        .where_(&s.first_name, is_like_case_insensitive("fr%"))
        .and(&s.id, is_not_in([1, 2, 3]))
        .limit(5)
        .build()
        .unwrap();

    let a = model.to_statement();
    let b = model.to_statement();
    assert_eq!(a.sql(), b.sql());
    assert_eq!(a.parameters(), b.parameters());
}

#[test]
fn test_subquery_condition_continues_sequence() {
    let s = schema();
    let address = Table::new("address");
    let address_person = address.column::<i32>("person_id", DataType::Integer);
    let city = address.column::<String>("city", DataType::Varchar);

    let sub = select(&address_person)
        .from(&address)
        .where_(&city, is_equal_to("Bedrock"))
        .build()
        .unwrap();

    let stmt = select(&s.id)
        .from(&s.person)
        .where_(&s.first_name, is_equal_to("Fred"))
        .and(&s.id, is_in_subquery(sub))
        .and(&s.employed, is_true())
        .build()
        .unwrap()
        .to_statement();

    assert_eq!(
        stmt.sql(),
        "select id from person where first_name = $1 \
         and id in (select person_id from address where city = $2) and employed = $3"
    );
    assert_eq!(stmt.parameters().len(), 3);
    assert_eq!(stmt.parameters().get("p2"), Some(&Value::from("Bedrock")));
    assert_eq!(stmt.parameters().get("p3"), Some(&Value::Bool(true)));
}

#[test]
fn test_scalar_subquery_comparisons() {
    let s = schema();
    let oldest = select(max(&s.id))
        .from(&s.person)
        .where_(&s.employed, is_false())
        .build()
        .unwrap();
    let excluded = select(&s.id)
        .from(&s.person)
        .where_(&s.last_name, is_equal_to("Slate"))
        .build()
        .unwrap();

    let stmt = delete_from(&s.person)
        .where_(&s.id, is_greater_than_subquery(oldest))
        .and(&s.id, is_not_in_subquery(excluded.clone()))
        .or(&s.id, is_equal_to_subquery(excluded).when(|| false))
        .build()
        .render(&RenderConfig::numbered());

    assert_eq!(
        stmt.sql(),
        "delete from person where id > (select max(id) from person where employed = ?1) \
         and id not in (select id from person where last_name = ?2)"
    );
    assert_eq!(stmt.parameters().keys().collect::<Vec<_>>(), vec!["1", "2"]);
}

#[test]
fn test_column_comparisons() {
    let s = schema();
    let manager_id = s.person.column::<i32>("manager_id", DataType::Integer);
    let stmt = select(&s.id)
        .from_as(&s.person, "p")
        .where_(&s.first_name, is_not_equal_to_column(&s.last_name))
        .and(&s.id, is_greater_than_column(&manager_id))
        .or(&s.id, is_less_than_or_equal_to_column(&manager_id))
        .build()
        .unwrap()
        .to_statement();

    assert_eq!(
        stmt.sql(),
        "select p.id from person p where p.first_name <> p.last_name \
         and p.id > p.manager_id or p.id <= p.manager_id"
    );
    assert!(stmt.parameters().is_empty());
}

#[test]
fn test_optional_between_and_case_insensitive() {
    let s = schema();
    let stmt = select(&s.id)
        .from(&s.person)
        .where_(&s.id, is_between_when_present(Some(1), None::<i32>))
        .and(&s.id, is_not_between_when_present(Some(2), Some(8)))
        .and(&s.last_name, is_like_case_insensitive_when_present(Some("ru%")))
        .and(&s.first_name, is_in_case_insensitive_when_present(vec![None::<&str>]))
        .build()
        .unwrap()
        .to_statement();

    assert_eq!(
        stmt.sql(),
        "select id from person where id not between $1 and $2 and upper(last_name) like $3"
    );
    assert_eq!(stmt.parameters().get("p3"), Some(&Value::from("RU%")));
}

#[test]
fn test_json_text_binds_through_jsonb_placeholder() {
    use bytes::BytesMut;
    use tokio_postgres::types::{ToSql, Type};

    let docs = Table::new("j");
    let info = docs
        .column::<String>("info", DataType::Jsonb)
        .with_rendering_strategy(RenderingStrategies::postgres_json());

    let stmt = insert_into(&docs)
        .set(&info)
        .to_value(r#"{"a":1}"#)
        .build()
        .unwrap()
        .to_statement();
    assert_eq!(stmt.sql(), "insert into j (info) values ($1::jsonb)");

    let mut buf = BytesMut::new();
    let params = stmt.params_ref();
    assert!(params[0].to_sql_checked(&Type::JSONB, &mut buf).is_ok());
    assert_eq!(buf[0], 1);
}
