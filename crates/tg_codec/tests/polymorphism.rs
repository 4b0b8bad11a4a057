use std::sync::Arc;

use tg_codec::codec::Array;
use tg_codec::{ErrorKind, PathReferenceHandler, TypeManager};
use tg_graph::{Graph, Type, Value};

struct Shape;
struct Circle;
struct Square;
struct Triangle;
struct Drawing;
struct Polygon;
struct Hexagon;

fn manager() -> TypeManager {
    let mut manager = TypeManager::new();
    manager
        .configure::<Shape>(|t| {
            t.property("label", |p| {
                p.ty::<String>();
            });
        })
        .configure::<Circle>(|t| {
            t.parent::<Shape>().discriminant("circle").property("radius", |p| {
                p.ty::<f64>();
            });
        })
        .configure::<Square>(|t| {
            t.parent::<Shape>().discriminant("square").property("side", |p| {
                p.ty::<f64>();
            });
        })
        .configure::<Drawing>(|t| {
            t.property("shapes", |p| {
                p.ty::<Array>().generic(Type::of::<Shape>());
            });
        });
    manager
}

fn record<'g>(graph: &'g Graph, value: &Value) -> &'g tg_graph::Record {
    graph.record(value.as_node().unwrap()).unwrap()
}

#[test]
fn variants_round_trip_through_the_base() {
    let manager = manager();
    let mut instances = Graph::new();
    let circle = instances.alloc_instance(Type::of::<Circle>(), [("label", Value::from("c")), ("radius", Value::from(2))]);
    let square = instances.alloc_instance(Type::of::<Square>(), [("label", Value::from("s")), ("side", Value::from(3))]);
    let shapes = instances.alloc_array([circle, square]);
    let drawing = Value::Node(instances.alloc_instance(Type::of::<Drawing>(), [("shapes", shapes)]));

    let mut wire = Graph::new();
    let encoded = manager
        .serialize(Type::of::<Drawing>(), &instances, &drawing, &mut wire)
        .unwrap()
        .unwrap();
    let shapes = wire.array(record(&wire, &encoded).get("shapes").unwrap().as_node().unwrap()).unwrap();
    let circle = record(&wire, &shapes[0]);
    let fields: Vec<_> = circle.iter().map(|(name, _)| name).collect();
    assert_eq!(fields, ["__type__", "label", "radius"]);
    assert_eq!(circle.get("__type__"), Some(&Value::from("circle")));
    assert_eq!(record(&wire, &shapes[1]).get("__type__"), Some(&Value::from("square")));

    let mut decoded = Graph::new();
    let back = manager
        .deserialize(Type::of::<Drawing>(), &wire, &encoded, &mut decoded)
        .unwrap()
        .unwrap();
    let shapes = decoded.array(record(&decoded, &back).get("shapes").unwrap().as_node().unwrap()).unwrap();
    let circle = record(&decoded, &shapes[0]);
    assert_eq!(circle.ty(), Some(Type::of::<Circle>()));
    assert!(!circle.contains("__type__"));
    assert_eq!(record(&decoded, &shapes[1]).ty(), Some(Type::of::<Square>()));
    assert!(instances.structural_eq(&drawing, &decoded, &back));
}

#[test]
fn missing_discriminator_decodes_the_declared_type() {
    let manager = manager();
    let mut wire = Graph::new();
    let shape = wire.alloc_record([("label", "plain")]);

    let mut decoded = Graph::new();
    let back = manager
        .deserialize(Type::of::<Shape>(), &wire, &Value::Node(shape), &mut decoded)
        .unwrap()
        .unwrap();
    assert_eq!(record(&decoded, &back).ty(), Some(Type::of::<Shape>()));
}

#[test]
fn base_instances_carry_their_own_discriminant() {
    let manager = manager();
    let mut instances = Graph::new();
    let shape = instances.alloc_instance(Type::of::<Shape>(), [("label", "plain")]);

    let mut wire = Graph::new();
    let encoded = manager
        .serialize(Type::of::<Shape>(), &instances, &Value::Node(shape), &mut wire)
        .unwrap()
        .unwrap();
    assert_eq!(record(&wire, &encoded).get("__type__"), Some(&Value::from("Shape")));
}

#[test]
fn unknown_discriminant_is_an_error() {
    let manager = manager();
    let mut wire = Graph::new();
    let hexagon = wire.alloc_record([("__type__", "hexagon")]);
    let shapes = wire.alloc_array([hexagon]);
    let drawing = wire.alloc_record([("shapes", shapes)]);

    let mut decoded = Graph::new();
    let error = manager
        .deserialize(Type::of::<Drawing>(), &wire, &Value::Node(drawing), &mut decoded)
        .unwrap_err();
    assert_eq!(error.path(), "$['shapes'][0]");
    assert!(matches!(
        error.kind(),
        ErrorKind::NoDiscriminantMatch { discriminant, .. } if discriminant == "hexagon"
    ));
}

#[test]
fn unregistered_runtime_type_is_an_error() {
    let manager = manager();
    let mut instances = Graph::new();
    let triangle = instances.alloc_instance(Type::of::<Triangle>(), [("label", "t")]);

    let mut wire = Graph::new();
    let error = manager
        .serialize(Type::of::<Shape>(), &instances, &Value::Node(triangle), &mut wire)
        .unwrap_err();
    assert_eq!(error.path(), "$");
    assert!(matches!(error.kind(), ErrorKind::UnknownVariant { variant, .. } if variant.is::<Triangle>()));
}

#[test]
fn leaf_types_write_no_discriminator_unless_preserved() {
    let mut manager = manager();
    let mut instances = Graph::new();
    let circle = Value::Node(instances.alloc_instance(Type::of::<Circle>(), [("radius", 1.0)]));

    let mut wire = Graph::new();
    let encoded = manager
        .serialize(Type::of::<Circle>(), &instances, &circle, &mut wire)
        .unwrap()
        .unwrap();
    assert!(!record(&wire, &encoded).contains("__type__"));

    manager.configure::<Circle>(|t| {
        t.preserve_discriminator(true);
    });
    let encoded = manager
        .serialize(Type::of::<Circle>(), &instances, &circle, &mut wire)
        .unwrap()
        .unwrap();
    assert_eq!(record(&wire, &encoded).get("__type__"), Some(&Value::from("circle")));

    let mut decoded = Graph::new();
    let back = manager
        .deserialize(Type::of::<Circle>(), &wire, &encoded, &mut decoded)
        .unwrap()
        .unwrap();
    assert_eq!(record(&decoded, &back).get("__type__"), Some(&Value::from("circle")));
}

#[test]
fn custom_discriminator_field() {
    let mut manager = manager();
    manager.configure_base(|base| base.discriminator = "kind".into());

    let mut wire = Graph::new();
    let square = wire.alloc_record([("kind", Value::from("square")), ("side", Value::from(4))]);

    let mut decoded = Graph::new();
    let back = manager
        .deserialize(Type::of::<Shape>(), &wire, &Value::Node(square), &mut decoded)
        .unwrap()
        .unwrap();
    let square = record(&decoded, &back);
    assert_eq!(square.ty(), Some(Type::of::<Square>()));
    assert_eq!(square.get("side"), Some(&Value::Number(4.0)));
    assert!(!square.contains("kind"));
}

#[test]
fn type_discriminator_reaches_the_variants() {
    let mut manager = manager();
    manager
        .configure::<Polygon>(|t| {
            t.parent::<Shape>().discriminant("polygon");
        })
        .configure::<Hexagon>(|t| {
            t.parent::<Polygon>().discriminant("hexagon");
        })
        .configure::<Shape>(|t| {
            t.discriminator("kind");
        });
    assert_eq!(manager.resolve_type(Type::of::<Hexagon>()).discriminator(), "kind");
    assert_eq!(manager.resolve_type(Type::of::<Triangle>()).discriminator(), "__type__");

    let mut instances = Graph::new();
    let circle = instances.alloc_instance(Type::of::<Circle>(), [("radius", 2.0)]);
    let hexagon = instances.alloc_instance(Type::of::<Hexagon>(), [("label", "h")]);
    let shapes = instances.alloc_array([circle, hexagon]);
    let drawing = Value::Node(instances.alloc_instance(Type::of::<Drawing>(), [("shapes", shapes)]));

    let mut wire = Graph::new();
    let encoded = manager
        .serialize(Type::of::<Drawing>(), &instances, &drawing, &mut wire)
        .unwrap()
        .unwrap();
    let shapes = wire.array(record(&wire, &encoded).get("shapes").unwrap().as_node().unwrap()).unwrap();
    let circle = record(&wire, &shapes[0]);
    let fields: Vec<_> = circle.iter().map(|(name, _)| name).collect();
    assert_eq!(fields, ["kind", "radius"]);
    assert_eq!(circle.get("kind"), Some(&Value::from("circle")));
    assert_eq!(record(&wire, &shapes[1]).get("kind"), Some(&Value::from("hexagon")));

    let mut decoded = Graph::new();
    let back = manager
        .deserialize(Type::of::<Drawing>(), &wire, &encoded, &mut decoded)
        .unwrap()
        .unwrap();
    let shapes = decoded.array(record(&decoded, &back).get("shapes").unwrap().as_node().unwrap()).unwrap();
    assert_eq!(record(&decoded, &shapes[0]).ty(), Some(Type::of::<Circle>()));
    assert_eq!(record(&decoded, &shapes[1]).ty(), Some(Type::of::<Hexagon>()));
    assert!(!record(&decoded, &shapes[1]).contains("kind"));
    assert!(instances.structural_eq(&drawing, &decoded, &back));
}

#[test]
fn shared_variants_under_the_path_strategy() {
    let mut manager = manager();
    manager.configure_base(|base| base.reference_handler = Arc::new(PathReferenceHandler));

    let mut instances = Graph::new();
    let circle = instances.alloc_instance(Type::of::<Circle>(), [("label", Value::from("c")), ("radius", Value::from(1))]);
    let shapes = instances.alloc_array([circle, circle]);
    let drawing = Value::Node(instances.alloc_instance(Type::of::<Drawing>(), [("shapes", shapes)]));

    let mut wire = Graph::new();
    let encoded = manager
        .serialize(Type::of::<Drawing>(), &instances, &drawing, &mut wire)
        .unwrap()
        .unwrap();
    let shapes = wire.array(record(&wire, &encoded).get("shapes").unwrap().as_node().unwrap()).unwrap();
    assert_eq!(record(&wire, &shapes[0]).get("__type__"), Some(&Value::from("circle")));
    let marker = record(&wire, &shapes[1]);
    assert_eq!(marker.get("$ref"), Some(&Value::from("$['shapes'][0]")));
    assert!(!marker.contains("__type__"));

    let mut decoded = Graph::new();
    let back = manager
        .deserialize(Type::of::<Drawing>(), &wire, &encoded, &mut decoded)
        .unwrap()
        .unwrap();
    let shapes = decoded.array(record(&decoded, &back).get("shapes").unwrap().as_node().unwrap()).unwrap();
    assert_eq!(shapes[0], shapes[1]);
    assert_eq!(record(&decoded, &shapes[0]).ty(), Some(Type::of::<Circle>()));
    assert!(instances.structural_eq(&drawing, &decoded, &back));
}
