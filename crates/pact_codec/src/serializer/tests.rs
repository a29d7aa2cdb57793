use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use core::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;

use crate::derive::{Compact, compact_trait};
use crate::info::{TypeInfo, Typed};
use crate::io::TypeKey;
use crate::registry::CodecRegistry;
use crate::resolver::ObjectTypeResolver;
use crate::{CodecError, Compact, CompactDictionary, CompactSerializer, DeserializationContext};

// -----------------------------------------------------------------------------
// Fixtures

#[compact_trait]
trait Shape: Compact {
    fn area(&self) -> i64;
}

#[derive(Compact, Default, Debug, PartialEq)]
#[compact(implements(dyn Shape))]
struct Circle {
    radius: i32,
}

impl Shape for Circle {
    fn area(&self) -> i64 {
        3 * i64::from(self.radius) * i64::from(self.radius)
    }
}

#[derive(Compact, Default, Debug, PartialEq)]
#[compact(implements(dyn Shape))]
struct Square {
    side: i32,
}

impl Shape for Square {
    fn area(&self) -> i64 {
        i64::from(self.side) * i64::from(self.side)
    }
}

#[derive(Compact, Default, Debug, PartialEq)]
struct Unrelated {
    flag: bool,
}

#[derive(Compact, Default, Debug, PartialEq)]
struct Vehicle {
    wheels: u8,
}

#[derive(Compact, Default, Debug, PartialEq)]
#[compact(base = Vehicle)]
struct Truck {
    wheels: u8,
    load: u16,
}

#[derive(Compact, Default)]
struct Holder {
    name: Option<String>,
    shape: Option<Box<dyn Shape>>,
}

#[derive(Compact, Default, Debug, PartialEq, Clone, Copy)]
#[compact(value)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Compact, Default, Debug, PartialEq)]
struct Segment {
    from: Point,
    to: Point,
}

#[derive(Compact, Default, Debug)]
struct Node {
    value: u8,
    next: Option<Box<Node>>,
}

struct Origin(&'static str);

#[derive(Compact, Debug, PartialEq)]
#[compact(create = Stamped::create)]
struct Stamped {
    #[compact(skip)]
    origin: &'static str,
    value: u8,
}

impl Stamped {
    fn create(ctx: &DeserializationContext<'_>) -> Result<Self, CodecError> {
        let origin = ctx.components().resolve::<Origin>()?;
        Ok(Self {
            origin: origin.0,
            value: 0,
        })
    }
}

fn registry() -> CodecRegistry {
    let mut registry = CodecRegistry::new();
    registry.register::<Circle>();
    registry.register::<Square>();
    registry.register::<Unrelated>();
    registry.register::<Vehicle>();
    registry.register::<Truck>();
    registry.register::<Holder>();
    registry.register::<Segment>();
    registry.register::<Node>();
    registry.register::<Stamped>();
    registry
}

fn serializer() -> CompactSerializer {
    CompactSerializer::new(registry())
}

fn chain(len: usize) -> Node {
    let mut node = Node {
        value: 0,
        next: None,
    };
    for value in 1..len {
        node = Node {
            value: value as u8,
            next: Some(Box::new(node)),
        };
    }
    node
}

// -----------------------------------------------------------------------------
// Polymorphism

#[test]
fn derived_type_under_abstract_declared_type_writes_key() {
    let serializer = serializer();
    let mut dictionary = CompactDictionary::new();
    let shape: Box<dyn Shape> = Box::new(Circle { radius: 5 });

    let bytes = serializer
        .get_bytes_of::<dyn Shape>(Some(&*shape), &mut dictionary)
        .unwrap();

    assert_eq!(bytes, [2, 1, 0, 5, 0, 0, 0]);
    assert_eq!(dictionary.key_of(Circle::type_info()), Some(TypeKey::FIRST));

    let shape = serializer
        .get_object_of::<dyn Shape>(&bytes, &dictionary)
        .unwrap()
        .unwrap();
    assert_eq!(shape.area(), 75);
    let object: Box<dyn Compact> = shape;
    assert_eq!(object.take::<Circle>().ok(), Some(Circle { radius: 5 }));
}

#[test]
fn exact_declared_type_writes_no_key() {
    let serializer = serializer();
    let mut dictionary = CompactDictionary::new();

    let bytes = serializer
        .get_bytes_of(Some(&Circle { radius: 5 }), &mut dictionary)
        .unwrap();

    assert_eq!(bytes, [1, 5, 0, 0, 0]);
    assert!(dictionary.is_empty());

    let circle = serializer
        .get_object_of::<Circle>(&bytes, &dictionary)
        .unwrap();
    assert_eq!(circle.as_deref(), Some(&Circle { radius: 5 }));
}

#[test]
fn keys_follow_first_use() {
    let serializer = serializer();
    let mut dictionary = CompactDictionary::new();
    let square: Box<dyn Shape> = Box::new(Square { side: 2 });
    let circle: Box<dyn Shape> = Box::new(Circle { radius: 1 });

    let first = serializer
        .get_bytes_of::<dyn Shape>(Some(&*square), &mut dictionary)
        .unwrap();
    let second = serializer
        .get_bytes_of::<dyn Shape>(Some(&*circle), &mut dictionary)
        .unwrap();

    assert_eq!(first[..3], [2, 1, 0]);
    assert_eq!(second[..3], [2, 2, 0]);
    assert_eq!(dictionary.len(), 2);
}

#[test]
fn unrelated_instance_is_rejected_on_write() {
    let serializer = serializer();
    let mut dictionary = CompactDictionary::new();

    let err = serializer
        .get_bytes(
            <dyn Shape>::type_info(),
            Some(&Unrelated { flag: true }),
            &mut dictionary,
        )
        .unwrap_err();

    assert!(matches!(err, CodecError::TypeMismatch { key: None, .. }));
    assert!(dictionary.is_empty());
}

#[test]
fn concrete_base_accepts_derived_instances() {
    let serializer = serializer();
    let mut dictionary = CompactDictionary::new();
    let truck = Truck {
        wheels: 6,
        load: 300,
    };

    let bytes = serializer
        .get_bytes(Vehicle::type_info(), Some(&truck), &mut dictionary)
        .unwrap();
    assert_eq!(bytes, [2, 1, 0, 6, 0x2C, 0x01]);
    assert_eq!(dictionary.type_of(TypeKey::FIRST), Some(Truck::type_info()));

    let object = serializer
        .get_object(Vehicle::type_info(), &bytes, &dictionary)
        .unwrap()
        .unwrap();
    assert_eq!(object.take::<Truck>().ok(), Some(truck));

    // Base types give assignability, not a cast to the base.
    let err = serializer
        .get_object_of::<Vehicle>(&bytes, &dictionary)
        .unwrap_err();
    assert!(matches!(err, CodecError::TypeMismatch { key: None, .. }));
}

#[test]
fn base_does_not_accept_unrelated_instances() {
    let serializer = serializer();
    let mut dictionary = CompactDictionary::new();

    let err = serializer
        .get_bytes(Truck::type_info(), Some(&Vehicle { wheels: 4 }), &mut dictionary)
        .unwrap_err();

    assert!(matches!(err, CodecError::TypeMismatch { .. }));
    assert!(dictionary.is_empty());
}

#[test]
fn abstract_values_debug_as_their_runtime_type() {
    let shape: Box<dyn Shape> = Box::new(Circle { radius: 1 });
    let printed = format!("{shape:?}");

    assert!(printed.starts_with("dyn Compact<"));
    assert!(printed.ends_with("::Circle>"));
}

// -----------------------------------------------------------------------------
// Null and nested objects

#[test]
fn null_top_level_is_a_single_byte() {
    let serializer = serializer();
    let mut dictionary = CompactDictionary::new();

    let bytes = serializer
        .get_bytes_of::<dyn Shape>(None, &mut dictionary)
        .unwrap();
    assert_eq!(bytes, [0]);

    let shape = serializer
        .get_object_of::<dyn Shape>(&bytes, &dictionary)
        .unwrap();
    assert!(shape.is_none());
}

#[test]
fn null_fields_are_written_as_null_headers() {
    let serializer = serializer();
    let mut dictionary = CompactDictionary::new();

    let bytes = serializer
        .get_bytes_of(Some(&Holder::default()), &mut dictionary)
        .unwrap();

    assert_eq!(bytes, [1, 0, 0]);
}

#[test]
fn nested_polymorphic_field_round_trips() {
    let serializer = serializer();
    let mut dictionary = CompactDictionary::new();
    let holder = Holder {
        name: Some("ab".into()),
        shape: Some(Box::new(Square { side: 3 })),
    };

    let bytes = serializer.get_bytes_of(Some(&holder), &mut dictionary).unwrap();
    assert_eq!(bytes, [1, 1, 2, b'a', b'b', 2, 1, 0, 3, 0, 0, 0]);

    let holder = serializer
        .get_object_of::<Holder>(&bytes, &dictionary)
        .unwrap()
        .unwrap();
    assert_eq!(holder.name.as_deref(), Some("ab"));
    let shape = holder.shape.unwrap();
    assert_eq!(shape.area(), 9);
}

#[test]
fn get_bytes_matches_write_object() {
    let serializer = serializer();
    let holder = Holder {
        name: Some("name".into()),
        shape: Some(Box::new(Circle { radius: -1 })),
    };

    let mut buffer_dictionary = CompactDictionary::new();
    let buffer = serializer
        .get_bytes_of(Some(&holder), &mut buffer_dictionary)
        .unwrap();

    let mut stream_dictionary = CompactDictionary::new();
    let mut stream = Vec::new();
    serializer
        .write_object_of(Some(&holder), &mut stream, &mut stream_dictionary)
        .unwrap();

    assert_eq!(buffer, stream);
    assert_eq!(buffer_dictionary.len(), stream_dictionary.len());
}

#[test]
fn read_object_consumes_only_its_bytes() {
    let serializer = serializer();
    let mut dictionary = CompactDictionary::new();
    let mut stream = Vec::new();
    serializer
        .write_object_of(Some(&Circle { radius: 1 }), &mut stream, &mut dictionary)
        .unwrap();
    serializer
        .write_object_of(Some(&Circle { radius: 2 }), &mut stream, &mut dictionary)
        .unwrap();

    let mut input = stream.as_slice();
    let first = serializer.read_object_of::<Circle>(&mut input, &dictionary).unwrap();
    let second = serializer.read_object_of::<Circle>(&mut input, &dictionary).unwrap();

    assert_eq!(first.unwrap().radius, 1);
    assert_eq!(second.unwrap().radius, 2);
    assert!(input.is_empty());
}

// -----------------------------------------------------------------------------
// Dictionary

#[test]
fn unknown_key_is_a_corrupt_dictionary() {
    let serializer = serializer();
    let mut dictionary = CompactDictionary::new();
    let shape: Box<dyn Shape> = Box::new(Circle { radius: 5 });
    let bytes = serializer
        .get_bytes_of::<dyn Shape>(Some(&*shape), &mut dictionary)
        .unwrap();

    let err = serializer
        .get_object_of::<dyn Shape>(&bytes, &CompactDictionary::new())
        .unwrap_err();

    assert!(matches!(err, CodecError::CorruptDictionary { key } if key == TypeKey::FIRST));
}

#[test]
fn seeded_dictionaries_agree() {
    let serializer = serializer();
    let types = [Square::type_info(), Circle::type_info()];
    let mut writer_dictionary = CompactDictionary::with_types(types).unwrap();
    let reader_dictionary = CompactDictionary::with_types(types).unwrap();
    let shape: Box<dyn Shape> = Box::new(Circle { radius: 4 });

    let bytes = serializer
        .get_bytes_of::<dyn Shape>(Some(&*shape), &mut writer_dictionary)
        .unwrap();
    assert_eq!(bytes[..3], [2, 2, 0]);

    let shape = serializer
        .get_object_of::<dyn Shape>(&bytes, &reader_dictionary)
        .unwrap()
        .unwrap();
    assert_eq!(shape.area(), 48);
}

#[test]
fn key_of_unassignable_type_is_a_mismatch() {
    let serializer = serializer();
    let dictionary = CompactDictionary::with_types([Unrelated::type_info()]).unwrap();

    let err = serializer
        .get_object_of::<dyn Shape>(&[2, 1, 0, 1], &dictionary)
        .unwrap_err();

    assert!(matches!(err, CodecError::TypeMismatch { key: Some(_), .. }));
}

#[test]
fn unknown_indicator_is_a_corrupt_stream() {
    let serializer = serializer();
    let err = serializer
        .get_object_of::<Circle>(&[7], &CompactDictionary::new())
        .unwrap_err();

    assert!(matches!(err, CodecError::CorruptStream { indicator: 7 }));
}

#[test]
fn truncated_input_is_an_io_error() {
    let serializer = serializer();
    let err = serializer
        .get_object_of::<Circle>(&[1, 5, 0], &CompactDictionary::new())
        .unwrap_err();

    assert!(err.is_unexpected_eof());
}

// -----------------------------------------------------------------------------
// Resolvers

struct AlwaysAs(&'static TypeInfo);

impl ObjectTypeResolver for AlwaysAs {
    fn serialization_type(&self, _: &'static TypeInfo, _: &dyn Compact) -> &'static TypeInfo {
        self.0
    }
}

struct ReadAs(&'static TypeInfo);

impl ObjectTypeResolver for ReadAs {
    fn deserialization_type(
        &self,
        _: &'static TypeInfo,
        _: &'static TypeInfo,
    ) -> &'static TypeInfo {
        self.0
    }
}

struct Materializer {
    calls: Arc<AtomicUsize>,
}

impl ObjectTypeResolver for Materializer {
    fn can_materialize(&self, _: &'static TypeInfo, serialized: &'static TypeInfo) -> bool {
        serialized.is::<Circle>()
    }

    fn materialize(
        &self,
        _: &'static TypeInfo,
        _: &'static TypeInfo,
    ) -> Result<Box<dyn Compact>, CodecError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(Circle { radius: 99 }))
    }
}

#[test]
fn first_resolver_with_an_opinion_wins() {
    let serializer = CompactSerializer::builder(registry())
        .resolver(AlwaysAs(Square::type_info()))
        .resolver(AlwaysAs(Unrelated::type_info()))
        .build();
    let mut dictionary = CompactDictionary::new();
    let shape: Box<dyn Shape> = Box::new(Circle { radius: 6 });

    let bytes = serializer
        .get_bytes_of::<dyn Shape>(Some(&*shape), &mut dictionary)
        .unwrap();

    assert_eq!(bytes, [2, 1, 0, 6, 0, 0, 0]);
    assert_eq!(dictionary.type_of(TypeKey::FIRST), Some(Square::type_info()));

    let shape = serializer
        .get_object_of::<dyn Shape>(&bytes, &dictionary)
        .unwrap()
        .unwrap();
    let object: Box<dyn Compact> = shape;
    assert_eq!(object.take::<Square>().ok(), Some(Square { side: 6 }));
}

#[test]
fn deserialization_type_replaces_the_constructed_type() {
    let serializer = CompactSerializer::builder(registry())
        .resolver(ReadAs(Square::type_info()))
        .build();
    let mut dictionary = CompactDictionary::new();
    let shape: Box<dyn Shape> = Box::new(Circle { radius: 2 });
    let bytes = serializer
        .get_bytes_of::<dyn Shape>(Some(&*shape), &mut dictionary)
        .unwrap();

    let shape = serializer
        .get_object_of::<dyn Shape>(&bytes, &dictionary)
        .unwrap()
        .unwrap();

    assert_eq!(shape.area(), 4);
    assert!(shape.as_compact().is::<Square>());
}

#[test]
fn materialized_instance_is_still_populated() {
    let calls = Arc::new(AtomicUsize::new(0));
    let serializer = CompactSerializer::builder(registry())
        .resolver(Materializer {
            calls: calls.clone(),
        })
        .build();
    let mut dictionary = CompactDictionary::new();
    let shape: Box<dyn Shape> = Box::new(Circle { radius: 5 });
    let bytes = serializer
        .get_bytes_of::<dyn Shape>(Some(&*shape), &mut dictionary)
        .unwrap();

    let shape = serializer
        .get_object_of::<dyn Shape>(&bytes, &dictionary)
        .unwrap()
        .unwrap();

    assert_eq!(calls.load(Ordering::Relaxed), 1);
    let object: Box<dyn Compact> = shape;
    assert_eq!(object.take::<Circle>().ok(), Some(Circle { radius: 5 }));

    // Square values are not offered to the materializer.
    let square: Box<dyn Shape> = Box::new(Square { side: 1 });
    let bytes = serializer
        .get_bytes_of::<dyn Shape>(Some(&*square), &mut dictionary)
        .unwrap();
    serializer
        .get_object_of::<dyn Shape>(&bytes, &dictionary)
        .unwrap();
    assert_eq!(calls.load(Ordering::Relaxed), 1);
}

// -----------------------------------------------------------------------------
// Value types

#[test]
fn value_types_are_written_inline() {
    let serializer = serializer();
    let mut dictionary = CompactDictionary::new();
    let point = Point { x: 1, y: -1 };

    let bytes = serializer.get_struct_bytes(&point, &mut dictionary).unwrap();
    assert_eq!(bytes, [1, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]);

    let read: Point = serializer.get_struct(&bytes, &dictionary).unwrap();
    assert_eq!(read, point);
}

#[test]
fn value_type_fields_have_no_header() {
    let serializer = serializer();
    let mut dictionary = CompactDictionary::new();
    let segment = Segment {
        from: Point { x: 1, y: 2 },
        to: Point { x: 3, y: 4 },
    };

    let bytes = serializer.get_bytes_of(Some(&segment), &mut dictionary).unwrap();
    assert_eq!(bytes.len(), 1 + 16);

    let read = serializer
        .get_object_of::<Segment>(&bytes, &dictionary)
        .unwrap();
    assert_eq!(read.as_deref(), Some(&segment));
}

#[test]
fn object_path_rejects_value_types() {
    let serializer = serializer();
    let mut dictionary = CompactDictionary::new();
    let point = Point::default();

    let err = serializer
        .get_bytes(Point::type_info(), Some(&point), &mut dictionary)
        .unwrap_err();
    assert!(matches!(err, CodecError::PreconditionViolation { .. }));

    let err = serializer
        .get_object(Point::type_info(), &[1], &dictionary)
        .unwrap_err();
    assert!(matches!(err, CodecError::PreconditionViolation { .. }));
}

#[test]
fn struct_path_rejects_reference_types() {
    let serializer = serializer();
    let mut dictionary = CompactDictionary::new();

    let err = serializer
        .get_struct_bytes(&Circle::default(), &mut dictionary)
        .unwrap_err();
    assert!(matches!(err, CodecError::PreconditionViolation { .. }));

    let err = serializer
        .get_struct::<Circle>(&[0, 0, 0, 0], &dictionary)
        .unwrap_err();
    assert!(matches!(err, CodecError::PreconditionViolation { .. }));
}

// -----------------------------------------------------------------------------
// Limits and failures

#[test]
fn depth_limit_applies_to_writes() {
    let serializer = CompactSerializer::builder(registry()).max_depth(3).build();
    let mut dictionary = CompactDictionary::new();

    assert!(serializer.get_bytes_of(Some(&chain(2)), &mut dictionary).is_ok());

    let err = serializer
        .get_bytes_of(Some(&chain(3)), &mut dictionary)
        .unwrap_err();
    assert!(matches!(err, CodecError::DepthLimitExceeded { limit: 3 }));
}

#[test]
fn depth_limit_applies_to_reads() {
    let serializer = CompactSerializer::builder(registry()).max_depth(3).build();
    let dictionary = CompactDictionary::new();

    let node = serializer
        .get_object_of::<Node>(&[1, 1, 1, 0, 0], &dictionary)
        .unwrap()
        .unwrap();
    assert_eq!(node.value, 1);

    let err = serializer
        .get_object_of::<Node>(&[1, 1, 1, 1, 1, 1, 0], &dictionary)
        .unwrap_err();
    assert!(matches!(err, CodecError::DepthLimitExceeded { limit: 3 }));
}

#[test]
fn missing_codec_leaves_output_untouched() {
    let serializer = CompactSerializer::new(CodecRegistry::empty());
    let mut dictionary = CompactDictionary::new();
    let mut output = Vec::new();

    let err = serializer
        .write_object_of(Some(&Circle { radius: 1 }), &mut output, &mut dictionary)
        .unwrap_err();

    assert!(matches!(err, CodecError::MissingCodec { .. }));
    assert!(output.is_empty());
}

#[test]
fn missing_codec_leaves_dictionary_untouched() {
    let mut registry = CodecRegistry::empty();
    registry.register::<Square>();
    let serializer = CompactSerializer::new(registry);
    let mut dictionary = CompactDictionary::new();
    let circle: Box<dyn Shape> = Box::new(Circle { radius: 1 });
    let square: Box<dyn Shape> = Box::new(Square { side: 1 });

    let mut output = Vec::new();
    let err = serializer
        .write_object_of::<dyn Shape>(Some(&*circle), &mut output, &mut dictionary)
        .unwrap_err();
    assert!(matches!(err, CodecError::MissingCodec { .. }));
    assert!(output.is_empty());
    assert!(dictionary.is_empty());

    let bytes = serializer
        .get_bytes_of::<dyn Shape>(Some(&*square), &mut dictionary)
        .unwrap();
    assert_eq!(bytes, [2, 1, 0, 1, 0, 0, 0]);
}

#[test]
fn length_limit_applies_to_writes() {
    let serializer = CompactSerializer::builder(registry()).max_length(4).build();
    let mut dictionary = CompactDictionary::new();

    let fits = Holder {
        name: Some("abcd".into()),
        shape: None,
    };
    assert!(serializer.get_bytes_of(Some(&fits), &mut dictionary).is_ok());

    let too_long = Holder {
        name: Some("abcde".into()),
        shape: None,
    };
    let err = serializer
        .get_bytes_of(Some(&too_long), &mut dictionary)
        .unwrap_err();
    assert!(matches!(err, CodecError::InvalidData { .. }));
}

#[test]
fn creators_read_components() {
    let serializer = CompactSerializer::builder(registry())
        .component(Origin("archive"))
        .build();
    let mut dictionary = CompactDictionary::new();
    let stamped = Stamped {
        origin: "ignored",
        value: 9,
    };

    let bytes = serializer.get_bytes_of(Some(&stamped), &mut dictionary).unwrap();
    assert_eq!(bytes, [1, 9]);

    let read = serializer
        .get_object_of::<Stamped>(&bytes, &dictionary)
        .unwrap()
        .unwrap();
    assert_eq!(
        *read,
        Stamped {
            origin: "archive",
            value: 9,
        }
    );
}

#[test]
fn missing_component_fails_the_read() {
    let serializer = serializer();
    let err = serializer
        .get_object_of::<Stamped>(&[1, 9], &CompactDictionary::new())
        .unwrap_err();

    assert!(matches!(err, CodecError::MissingComponent { .. }));
}

proptest! {
    #[test]
    fn arbitrary_input_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let serializer = serializer();
        let dictionary = CompactDictionary::with_types([
            Circle::type_info(),
            Square::type_info(),
            Unrelated::type_info(),
        ])
        .unwrap();

        let _ = serializer.get_object_of::<dyn Shape>(&bytes, &dictionary);
        let _ = serializer.get_object_of::<Holder>(&bytes, &dictionary);
        let _ = serializer.get_object_of::<Node>(&bytes, &dictionary);
    }
}
