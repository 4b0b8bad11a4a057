use std::sync::Arc;

use tg_codec::codec::{Array, StringCodec};
use tg_codec::factory::{Factory, FactoryError, PropertyEntries};
use tg_codec::injector::{Injector, ServiceInjector};
use tg_codec::metadata::{DefaultValue, TypeMetadata};
use tg_codec::naming::{CamelCase, SnakeCase};
use tg_codec::sorter::{AscInjectSorter, DescPropertySorter};
use tg_codec::{ErrorKind, TypeManager};
use tg_graph::{Graph, Record, Type, Value};

fn decode(manager: &TypeManager, ty: Type, wire: &Graph, value: Value, graph: &mut Graph) -> Value {
    manager.deserialize(ty, wire, &value, graph).unwrap().unwrap()
}

fn encode(manager: &TypeManager, ty: Type, instances: &Graph, value: Value, wire: &mut Graph) -> Value {
    manager.serialize(ty, instances, &value, wire).unwrap().unwrap()
}

fn record<'g>(graph: &'g Graph, value: &Value) -> &'g Record {
    graph.record(value.as_node().unwrap()).unwrap()
}

// -----------------------------------------------------------------------------
// Absent and null values

struct Settings;

fn settings() -> TypeManager {
    let mut manager = TypeManager::new();
    manager.configure::<Settings>(|t| {
        t.property("volume", |p| {
            p.ty::<f64>().use_default_value(true).default_value(5.0);
        })
        .property("theme", |p| {
            p.ty::<String>().preserve_null(false);
        })
        .property("label", |p| {
            p.ty::<String>();
        })
        .property("tags", |p| {
            p.ty::<Array>()
                .generic(Type::of::<String>())
                .use_default_value(true)
                .deserialized_default_value(DefaultValue::lazy(|graph| {
                    Value::Node(graph.alloc_array::<Value>([]))
                }));
        });
    });
    manager
}

#[test]
fn absent_and_null_policy() {
    let manager = settings();
    let mut wire = Graph::new();
    let input = wire.alloc_record([("theme", Value::Null), ("label", Value::Null)]);

    let mut decoded = Graph::new();
    let back = decode(&manager, Type::of::<Settings>(), &wire, Value::Node(input), &mut decoded);
    let settings = record(&decoded, &back);
    assert_eq!(settings.get("volume"), Some(&Value::Number(5.0)));
    assert!(!settings.contains("theme"));
    assert_eq!(settings.get("label"), Some(&Value::Null));
    let tags = settings.get("tags").unwrap().as_node().unwrap();
    assert_eq!(decoded.array(tags), Some(&[][..]));
}

#[test]
fn lazy_defaults_are_fresh() {
    let manager = settings();
    let mut wire = Graph::new();
    let first = wire.alloc_record::<&str, Value>([]);
    let second = wire.alloc_record::<&str, Value>([]);

    let mut decoded = Graph::new();
    let first = decode(&manager, Type::of::<Settings>(), &wire, Value::Node(first), &mut decoded);
    let second = decode(&manager, Type::of::<Settings>(), &wire, Value::Node(second), &mut decoded);
    assert_ne!(record(&decoded, &first).get("tags"), record(&decoded, &second).get("tags"));
}

#[test]
fn type_level_defaults_apply_to_every_use() {
    struct Counter;

    let mut manager = TypeManager::new();
    manager
        .configure::<f64>(|t| {
            t.use_default_value(true).serialized_default_value(0.0);
        })
        .configure::<Counter>(|t| {
            t.property("hits", |p| {
                p.ty::<f64>();
            })
            .property("misses", |p| {
                p.ty::<f64>().use_default_value(false);
            });
        });

    let mut instances = Graph::new();
    let counter = instances.alloc_instance::<&str, Value>(Type::of::<Counter>(), []);
    let mut wire = Graph::new();
    let encoded = encode(&manager, Type::of::<Counter>(), &instances, Value::Node(counter), &mut wire);
    let counter = record(&wire, &encoded);
    assert_eq!(counter.get("hits"), Some(&Value::Number(0.0)));
    assert!(!counter.contains("misses"));
}

// -----------------------------------------------------------------------------
// Naming and visibility

#[test]
fn naming_conventions_and_aliases() {
    struct Account;

    let mut manager = TypeManager::new();
    manager.configure_base(|base| base.naming_convention = Some(Arc::new(SnakeCase)));
    manager.configure::<Account>(|t| {
        t.property("createdAt", |p| {
            p.ty::<String>();
        })
        .property("userName", |p| {
            p.ty::<String>().alias("login");
        });
    });

    let mut instances = Graph::new();
    let account = Value::Node(instances.alloc_instance(Type::of::<Account>(), [("createdAt", "today"), ("userName", "ada")]));
    let mut wire = Graph::new();
    let encoded = encode(&manager, Type::of::<Account>(), &instances, account.clone(), &mut wire);
    let fields: Vec<_> = record(&wire, &encoded).iter().map(|(name, _)| name).collect();
    assert_eq!(fields, ["created_at", "login"]);

    let mut decoded = Graph::new();
    let back = decode(&manager, Type::of::<Account>(), &wire, encoded, &mut decoded);
    let restored = record(&decoded, &back);
    assert_eq!(restored.get("createdAt"), Some(&Value::from("today")));
    assert_eq!(restored.get("userName"), Some(&Value::from("ada")));

    // the type's own convention wins over the base one
    manager.configure::<Account>(|t| {
        t.naming_convention(CamelCase);
    });
    let encoded = encode(&manager, Type::of::<Account>(), &instances, account, &mut wire);
    assert!(record(&wire, &encoded).contains("createdAt"));
}

#[test]
fn serializable_and_deserializable_flags() {
    struct Secret;

    let mut manager = TypeManager::new();
    manager.configure::<Secret>(|t| {
        t.property("password", |p| {
            p.ty::<String>().serializable(false);
        })
        .property("hash", |p| {
            p.ty::<String>().deserializable(false);
        });
    });

    let mut instances = Graph::new();
    let secret = instances.alloc_instance(Type::of::<Secret>(), [("password", "hunter2"), ("hash", "abc")]);
    let mut wire = Graph::new();
    let encoded = encode(&manager, Type::of::<Secret>(), &instances, Value::Node(secret), &mut wire);
    let fields: Vec<_> = record(&wire, &encoded).iter().map(|(name, _)| name).collect();
    assert_eq!(fields, ["hash"]);

    let input = wire.alloc_record([("password", "hunter2"), ("hash", "abc")]);
    let mut decoded = Graph::new();
    let back = decode(&manager, Type::of::<Secret>(), &wire, Value::Node(input), &mut decoded);
    let secret = record(&decoded, &back);
    assert_eq!(secret.get("password"), Some(&Value::from("hunter2")));
    assert!(!secret.contains("hash"));
}

#[test]
fn property_sorter_orders_the_wire() {
    struct Point;

    let mut manager = TypeManager::new();
    manager.configure::<Point>(|t| {
        t.property_sorter(DescPropertySorter)
            .property("x", |p| {
                p.ty::<f64>();
            })
            .property("z", |p| {
                p.ty::<f64>();
            })
            .property("y", |p| {
                p.ty::<f64>();
            });
    });

    let mut instances = Graph::new();
    let point = instances.alloc_instance(Type::of::<Point>(), [("x", 1.0), ("y", 2.0), ("z", 3.0)]);
    let mut wire = Graph::new();
    let encoded = encode(&manager, Type::of::<Point>(), &instances, Value::Node(point), &mut wire);
    let fields: Vec<_> = record(&wire, &encoded).iter().map(|(name, _)| name).collect();
    assert_eq!(fields, ["z", "y", "x"]);
}

#[test]
fn property_codec_overrides_the_type() {
    struct Sensor;

    let mut manager = TypeManager::new();
    manager.configure::<Sensor>(|t| {
        t.property("id", |p| {
            p.ty::<f64>().codec(StringCodec).use_implicit_conversion(true);
        });
    });

    let mut instances = Graph::new();
    let sensor = instances.alloc_instance(Type::of::<Sensor>(), [("id", 7)]);
    let mut wire = Graph::new();
    let encoded = encode(&manager, Type::of::<Sensor>(), &instances, Value::Node(sensor), &mut wire);
    assert_eq!(record(&wire, &encoded).get("id"), Some(&Value::from("7")));
}

// -----------------------------------------------------------------------------
// Inheritance

#[test]
fn overridden_properties_apply_to_the_subtype_only() {
    struct Vehicle;
    struct Car;

    let mut manager = TypeManager::new();
    manager
        .configure::<Vehicle>(|t| {
            t.property("wheels", |p| {
                p.ty::<f64>();
            })
            .property("brand", |p| {
                p.ty::<String>();
            });
        })
        .configure::<Car>(|t| {
            t.parent::<Vehicle>().property("wheels", |p| {
                p.alias("tyres").use_default_value(true).default_value(4.0);
            });
        });

    let mut instances = Graph::new();
    let car = instances.alloc_instance(Type::of::<Car>(), [("brand", "Volvo")]);
    let vehicle = instances.alloc_instance(Type::of::<Vehicle>(), [("brand", "Vespa")]);

    let mut wire = Graph::new();
    let car = encode(&manager, Type::of::<Car>(), &instances, Value::Node(car), &mut wire);
    let fields: Vec<_> = record(&wire, &car).iter().map(|(name, _)| name).collect();
    assert_eq!(fields, ["tyres", "brand"]);
    assert_eq!(record(&wire, &car).get("tyres"), Some(&Value::Number(4.0)));

    let vehicle = encode(&manager, Type::of::<Vehicle>(), &instances, Value::Node(vehicle), &mut wire);
    let fields: Vec<_> = record(&wire, &vehicle).iter().map(|(name, _)| name).collect();
    assert_eq!(fields, ["__type__", "brand"]);
}

// -----------------------------------------------------------------------------
// Factory and injection

struct Order;
struct Clock;

#[test]
fn injected_instances_are_filled() {
    let mut manager = TypeManager::new();
    manager.configure::<Order>(|t| {
        t.property("total", |p| {
            p.ty::<f64>();
        })
        .injector(ServiceInjector::new().with::<Order>(|graph| {
            Value::Node(graph.alloc_instance(Type::of::<Order>(), [("source", "injector")]))
        }))
        .inject_sorter(AscInjectSorter)
        .inject(0, |i| {
            i.name("amount").key("total");
        });
    });

    let mut wire = Graph::new();
    let input = wire.alloc_record([("total", 9.5)]);
    let mut decoded = Graph::new();
    let back = decode(&manager, Type::of::<Order>(), &wire, Value::Node(input), &mut decoded);

    let order = record(&decoded, &back);
    assert_eq!(order.ty(), Some(Type::of::<Order>()));
    assert_eq!(order.get("source"), Some(&Value::from("injector")));
    assert_eq!(order.get("total"), Some(&Value::Number(9.5)));
    assert_eq!(order.get("amount"), Some(&Value::Number(9.5)));
}

struct Failing;

impl Factory for Failing {
    fn build(
        &self,
        metadata: &TypeMetadata,
        _entries: PropertyEntries,
        _injector: &dyn Injector,
        _graph: &mut Graph,
    ) -> Result<Value, FactoryError> {
        Err(format!("{} is read only", metadata.name()).into())
    }
}

#[test]
fn factory_errors_carry_the_path() {
    struct Ledger;

    let mut manager = TypeManager::new();
    manager
        .configure::<Clock>(|t| {
            t.factory(Failing);
        })
        .configure::<Ledger>(|t| {
            t.property("clock", |p| {
                p.ty::<Clock>();
            });
        });

    let mut wire = Graph::new();
    let clock = wire.alloc_record::<&str, Value>([]);
    let ledger = wire.alloc_record([("clock", clock)]);
    let mut decoded = Graph::new();
    let error = manager
        .deserialize(Type::of::<Ledger>(), &wire, &Value::Node(ledger), &mut decoded)
        .unwrap_err();
    assert_eq!(error.path(), "$['clock']");
    assert!(matches!(error.kind(), ErrorKind::Factory { ty, .. } if ty.is::<Clock>()));
    assert!(error.to_string().contains("Clock is read only"));
}

#[test]
fn custom_data_is_reachable_from_metadata() {
    struct Column(&'static str);

    let mut manager = TypeManager::new();
    manager.configure::<Order>(|t| {
        t.custom_data(Column("orders")).property("total", |p| {
            p.ty::<f64>().custom_data(Column("total_cents"));
        });
    });

    let order = manager.resolve_type(Type::of::<Order>());
    assert_eq!(order.custom_data().get::<Column>().unwrap().0, "orders");
    let total = order.property("total").unwrap();
    assert_eq!(total.custom_data().get::<Column>().unwrap().0, "total_cents");
}
