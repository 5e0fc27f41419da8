//! Integration tests for the metadata graph.
//!
//! Every test builds its own [`Registry`], so the tests can run in parallel
//! without sharing any state.

use std::sync::{
    Arc,
    atomic::{AtomicI32, AtomicUsize, Ordering},
};

use metagraph::{Any, Handle, Id, Policy, Registry, RegistrationError, Type, impl_reflect};

#[derive(Clone, Debug, Default, PartialEq)]
struct Parent {
    id: u32,
}

#[derive(Clone, Debug, PartialEq)]
struct Child {
    parent: Parent,
    value: i32,
    tag: char,
}

impl AsRef<Parent> for Child {
    fn as_ref(&self) -> &Parent {
        &self.parent
    }
}

impl AsMut<Parent> for Child {
    fn as_mut(&mut self) -> &mut Parent {
        &mut self.parent
    }
}

impl_reflect!(Parent: Clone, PartialEq);
impl_reflect!(Child: Clone, PartialEq);

fn child(value: i32) -> Child {
    Child {
        parent: Parent { id: 1 },
        value,
        tag: 'c',
    }
}

fn hierarchy() -> Result<Registry, RegistrationError> {
    let mut registry = Registry::new();
    registry
        .reflect::<Parent>(Id::from("parent"))?
        .prop("kind", "parent")?
        .conv_with(|parent: &Parent| u64::from(parent.id))?
        .ctor_with(|id: u32| Parent { id })?
        .field(Id::from("id"), |p: &Parent| &p.id, |p: &mut Parent| &mut p.id)?
        .func_const(Id::from("offset"), |p: &Parent, by: i32| p.id as i32 + by)?;
    registry
        .reflect::<Child>(Id::from("child"))?
        .base::<Parent>()?
        .ctor_with(|parent: Parent, value: i32, tag: char| Child { parent, value, tag })?
        .field(Id::from("value"), |c: &Child| &c.value, |c: &mut Child| &mut c.value)?
        .alias()?
        .field_const(Id::from("tag"), |c: &Child| &c.tag)?
        .func(Id::from("bump"), |c: &mut Child, by: i32| {
            c.value += by;
            c.value
        })?
        .func(Id::from("reset"), |c: &mut Child| {
            c.value = 0;
            c.value
        })?
        .discard()?
        .func_alias(Id::from("value_mut"), |c: &mut Child| &mut c.value)?;
    Ok(registry)
}

static_assertions::assert_impl_all!(Registry: Send, Sync);
static_assertions::assert_not_impl_any!(Any<'static, 'static>: Send, Sync);
static_assertions::assert_impl_all!(Type<'static>: Copy);

#[test]
fn test_named_constants() -> Result<(), RegistrationError> {
    let mut registry = Registry::new();
    registry
        .reflect::<i32>(Id::from("int"))?
        .constant(Id::from("min"), 0u32)?
        .constant(Id::from("max"), 100u32)?;

    let int = registry.resolve_id(Id::from("int")).unwrap();
    assert!(int.is::<i32>());

    let min = int.data(Id::from("min")).unwrap();
    assert!(min.is_const());
    assert!(min.is_static());
    assert_eq!(min.get(Handle::empty()).try_cast::<u32>(), Some(&0));
    assert!(!min.set(Handle::empty(), 100u32));
    assert_eq!(min.get(Handle::empty()).try_cast::<u32>(), Some(&0));

    assert_eq!(
        int.get(Id::from("max"), Handle::empty()).try_cast::<u32>(),
        Some(&100)
    );
    Ok(())
}

#[test]
fn test_construct_with_base_argument() -> Result<(), RegistrationError> {
    let registry = hierarchy()?;
    let ty = registry.resolve::<Child>();

    let value = ty.construct((Parent::default(), 42i32, 'c'));
    let value = value.try_cast::<Child>().unwrap();
    assert_eq!((value.value, value.tag), (42, 'c'));

    assert!(ty.construct((Parent::default(), 'c', 42i32)).is_empty());
    assert!(ty.construct((Parent::default(), 42i32)).is_empty());

    assert!(ty.ctor::<(Parent, i32, char)>().is_some());
    assert!(ty.ctor::<(Parent, char, i32)>().is_none());
    Ok(())
}

#[test]
fn test_const_field() -> Result<(), RegistrationError> {
    let registry = hierarchy()?;
    let tag = registry.resolve::<Child>().data(Id::from("tag")).unwrap();
    assert!(tag.is_const());
    assert!(!tag.is_static());

    let mut value = child(0);
    assert!(!tag.set(&mut value, 'z'));
    assert_eq!(value.tag, 'c');
    assert_eq!(tag.get(&value).try_cast::<char>(), Some(&'c'));

    value.tag = 'q';
    assert_eq!(tag.get(&value).try_cast::<char>(), Some(&'q'));
    Ok(())
}

#[derive(Clone, Debug, PartialEq)]
struct Grid {
    cells: [u8; 3],
}

impl_reflect!(Grid: Clone, PartialEq);

#[test]
fn test_array_field() -> Result<(), RegistrationError> {
    let mut registry = Registry::new();
    registry.reflect::<Grid>(Id::from("grid"))?.array_field(
        Id::from("cells"),
        |g: &Grid| &g.cells,
        |g: &mut Grid| &mut g.cells,
    )?;

    let cells = registry.resolve::<Grid>().data(Id::from("cells")).unwrap();
    assert!(cells.ty().is_array());
    assert_eq!(cells.ty().extent(), 3);

    let mut grid = Grid { cells: [0; 3] };
    for index in 0..3 {
        assert!(cells.set_at(&mut grid, index, index as u8 * 2));
    }
    for index in 0..3 {
        let expected = index as u8 * 2;
        assert_eq!(cells.get_at(&grid, index).try_cast::<u8>(), Some(&expected));
    }

    assert!(!cells.set_at(&mut grid, 1, "two"));
    assert_eq!(grid.cells[1], 2);

    assert!(cells.get_at(&grid, 3).is_empty());
    assert!(!cells.set_at(&mut grid, 3, 1u8));
    assert!(cells.get(&grid).is_empty());
    assert!(!cells.set(&mut grid, 1u8));
    Ok(())
}

#[test]
fn test_round_trip_and_alias() -> Result<(), RegistrationError> {
    let registry = hierarchy()?;

    let mut owned = registry.any(child(1));
    owned.cast_mut::<Child>().value = 7;
    assert_eq!(owned.cast::<Child>(), &child(7));

    let mut native = child(1);
    {
        let mut alias = Any::from_mut(&registry, &mut native);
        assert!(alias.is_alias());
        alias.cast_mut::<Child>().value = 9;
    }
    assert_eq!(native.value, 9);

    let value = registry.resolve::<Child>().data(Id::from("value")).unwrap();
    assert_eq!(value.policy(), Policy::Alias);
    {
        let mut alias = value.get(&mut native);
        assert!(alias.is_alias());
        *alias.cast_mut::<i32>() = 11;
    }
    assert_eq!(native.value, 11);

    let mut shared = value.get(&native);
    assert!(shared.is_alias());
    assert!(shared.try_cast_mut::<i32>().is_none());
    assert_eq!(shared.try_cast::<i32>(), Some(&11));
    Ok(())
}

#[test]
fn test_inline_and_boxed_swap() {
    let registry = Registry::new();

    let mut small = registry.any(7u8);
    let mut large = registry.any([1u64, 2, 3, 4]);
    assert!(small.is_inline());
    assert!(!large.is_inline());

    small.swap(&mut large);
    assert!(!small.is_inline());
    assert!(large.is_inline());
    assert_eq!(small.try_cast::<[u64; 4]>(), Some(&[1, 2, 3, 4]));
    assert_eq!(large.try_cast::<u8>(), Some(&7));

    let copy = small.clone();
    assert_eq!(copy, small);
    assert!(!copy.is_inline());
    drop(small);
    assert_eq!(copy.try_cast::<[u64; 4]>(), Some(&[1, 2, 3, 4]));
}

#[test]
fn test_cast_through_base() -> Result<(), RegistrationError> {
    let registry = hierarchy()?;
    let value = registry.any(child(3));

    let native: *const Parent = &value.cast::<Child>().parent;
    let reflected: *const Parent = value.try_cast::<Parent>().unwrap();
    assert!(std::ptr::eq(native, reflected));

    assert!(value.can_cast::<Parent>());
    assert!(value.try_cast::<String>().is_none());

    let parent = registry.any(Parent::default());
    assert!(parent.try_cast::<Child>().is_none());

    let base = registry.resolve::<Child>().base(Id::from("parent")).unwrap();
    assert_eq!(base.ty(), registry.resolve::<Parent>());
    assert!(std::ptr::eq(base.cast(&value).data().cast::<Parent>(), native));
    Ok(())
}

#[derive(Clone, Debug, PartialEq)]
struct Celsius(f64);

#[derive(Clone, Debug, PartialEq)]
struct Fahrenheit(f64);

impl_reflect!(Celsius: Clone, PartialEq);
impl_reflect!(Fahrenheit: Clone, PartialEq);

#[test]
fn test_convert() -> Result<(), RegistrationError> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut registry = Registry::new();
    registry
        .reflect::<Celsius>(Id::from("celsius"))?
        .conv_with(move |c: &Celsius| {
            counter.fetch_add(1, Ordering::SeqCst);
            Fahrenheit(c.0 * 9.0 / 5.0 + 32.0)
        })?;

    let boiling = registry.any(Celsius(100.0));
    assert_eq!(boiling.convert::<Celsius>(), boiling);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let converted = boiling.convert::<Fahrenheit>();
    assert_eq!(converted.try_cast::<Fahrenheit>(), Some(&Fahrenheit(212.0)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert!(boiling.convert::<String>().is_empty());
    assert!(boiling.can_convert::<Fahrenheit>());
    assert!(!boiling.can_cast::<Fahrenheit>());

    let mut freezing = registry.any(Celsius(0.0));
    assert!(freezing.coerce::<Fahrenheit>());
    assert_eq!(freezing.try_cast::<Fahrenheit>(), Some(&Fahrenheit(32.0)));
    assert!(!freezing.coerce::<Celsius>());
    Ok(())
}

#[test]
fn test_convert_through_base() -> Result<(), RegistrationError> {
    let registry = hierarchy()?;
    let value = registry.any(child(0));
    assert_eq!(value.convert::<u64>().try_cast::<u64>(), Some(&1));
    assert!(registry.resolve::<Child>().conv::<u64>().is_some());
    Ok(())
}

#[derive(Clone, Debug, PartialEq)]
struct Reading(&'static str);

impl_reflect!(Reading: Clone, PartialEq);

fn readings(float_first: bool) -> Result<Registry, RegistrationError> {
    let mut registry = Registry::new();
    registry.reflect::<i32>(Id::from("int"))?.conv::<f64>()?;
    let factory = registry.reflect::<Reading>(Id::from("reading"))?;
    if float_first {
        factory
            .ctor_with(|_: f64| Reading("float"))?
            .ctor_with(|_: i32| Reading("int"))?;
    } else {
        factory
            .ctor_with(|_: i32| Reading("int"))?
            .ctor_with(|_: f64| Reading("float"))?;
    }
    Ok(registry)
}

#[test]
fn test_first_matching_constructor_wins() -> Result<(), RegistrationError> {
    let registry = readings(true)?;
    let ty = registry.resolve::<Reading>();
    for _ in 0..3 {
        assert_eq!(ty.construct((1i32,)).try_cast::<Reading>(), Some(&Reading("float")));
    }

    let registry = readings(false)?;
    let ty = registry.resolve::<Reading>();
    for _ in 0..3 {
        assert_eq!(ty.construct((1i32,)).try_cast::<Reading>(), Some(&Reading("int")));
    }
    assert_eq!(ty.construct((1.5f64,)).try_cast::<Reading>(), Some(&Reading("float")));
    assert!(ty.construct(("one",)).is_empty());
    Ok(())
}

#[test]
fn test_functions() -> Result<(), RegistrationError> {
    let registry = hierarchy()?;
    let ty = registry.resolve::<Child>();
    let mut value = registry.any(child(1));

    let bump = ty.func(Id::from("bump")).unwrap();
    assert_eq!(bump.arity(), 1);
    assert!(!bump.is_const());
    assert_eq!(bump.ret(), registry.resolve::<i32>());
    assert_eq!(bump.invoke(&mut value, (4i32,)).try_cast::<i32>(), Some(&5));

    // Shared receivers cannot call mutating functions.
    assert!(bump.invoke(&value, (4i32,)).is_empty());
    assert!(bump.invoke(Handle::empty(), (4i32,)).is_empty());
    assert!(bump.invoke(&mut value, ("four",)).is_empty());

    let mut parent = Parent::default();
    assert!(bump.invoke(&mut parent, (1i32,)).is_empty());

    // Functions of the base are found and invoked on derived values.
    assert_eq!(
        ty.invoke(Id::from("offset"), &value, (10i32,)).try_cast::<i32>(),
        Some(&11)
    );

    let reset = ty.func(Id::from("reset")).unwrap();
    assert_eq!(reset.policy(), Policy::Void);
    assert!(reset.ret().is_void());
    assert!(reset.invoke(&mut value, ()).try_cast::<()>().is_some());
    assert_eq!(value.cast::<Child>().value, 0);

    let value_mut = ty.func(Id::from("value_mut")).unwrap();
    let mut native = child(2);
    {
        let mut alias = value_mut.invoke(&mut native, ());
        assert!(alias.is_alias());
        *alias.cast_mut::<i32>() = 20;
    }
    assert_eq!(native.value, 20);
    Ok(())
}

#[test]
fn test_data_through_handles() -> Result<(), RegistrationError> {
    let registry = hierarchy()?;
    let ty = registry.resolve::<Child>();
    let mut value = registry.any(child(1));

    assert!(ty.set(Id::from("id"), &mut value, 8u32));
    assert_eq!(value.cast::<Parent>().id, 8);
    assert_eq!(ty.get(Id::from("id"), &value).try_cast::<u32>(), Some(&8));

    assert!(!ty.set(Id::from("id"), &value, 9u32));
    assert!(!ty.set(Id::from("missing"), &mut value, 9u32));
    assert!(ty.get(Id::from("missing"), &value).is_empty());
    assert!(ty.get(Id::from("id"), Handle::empty()).is_empty());
    Ok(())
}

#[test]
fn test_owned_results_outlive_aliases() -> Result<(), RegistrationError> {
    let registry = hierarchy()?;
    let ty = registry.resolve::<Child>();
    let mut native = child(4);

    let id = ty.get(Id::from("id"), &mut native).into_owned();
    let converted = Any::from_mut(&registry, &mut native).convert::<u64>();
    let copy = Any::from_ref(&registry, &native).try_clone().unwrap();
    native.value = 40;
    native.parent.id = 2;

    assert_eq!(id.try_cast::<u32>(), Some(&1));
    assert_eq!(converted.try_cast::<u64>(), Some(&1));
    assert_eq!(copy.cast::<Child>(), &child(4));
    assert_eq!(native.value, 40);
    Ok(())
}

/// A value that can only be moved.
#[derive(Debug, PartialEq)]
struct Token(u32);

#[derive(Debug, PartialEq)]
struct Ticket {
    number: u32,
    from_token: bool,
}

impl_reflect!(Token);
impl_reflect!(Ticket);

#[test]
fn test_arguments_without_clone() -> Result<(), RegistrationError> {
    let mut registry = Registry::new();
    registry
        .reflect::<Token>(Id::from("token"))?
        .conv_with(|token: &Token| token.0)?;
    registry
        .reflect::<Ticket>(Id::from("ticket"))?
        .ctor_with(|token: Token| Ticket { number: token.0, from_token: true })?
        .ctor_with(|number: u32| Ticket { number, from_token: false })?
        .func_static(Id::from("peek"), |token: Token| token.0)?;
    let ty = registry.resolve::<Ticket>();
    assert!(ty.ctor::<(Token,)>().is_some());

    // Owned tokens are moved into the callee.
    let ticket = ty.construct((Token(5),));
    assert_eq!(ticket.try_cast::<Ticket>(), Some(&Ticket { number: 5, from_token: true }));
    let peek = ty.invoke(Id::from("peek"), Handle::empty(), (Token(6),));
    assert_eq!(peek.try_cast::<u32>(), Some(&6));

    // A borrowed token cannot be moved, so the conversion to `u32` is used.
    let token = Token(7);
    let ticket = ty.construct([Any::from_ref(&registry, &token)]);
    assert_eq!(ticket.try_cast::<Ticket>(), Some(&Ticket { number: 7, from_token: false }));
    let borrowed = [Any::from_ref(&registry, &token)];
    assert!(ty.invoke(Id::from("peek"), Handle::empty(), borrowed).is_empty());
    Ok(())
}

#[test]
fn test_props_from_base() -> Result<(), RegistrationError> {
    let registry = hierarchy()?;
    let child = registry.resolve::<Child>();

    let kind = child.prop("kind").unwrap();
    assert_eq!(kind.value().try_cast::<&'static str>(), Some(&"parent"));
    assert_eq!(kind.key().try_cast::<&'static str>(), Some(&"kind"));
    assert_eq!(child.props().count(), 1);
    assert!(child.prop("missing").is_none());
    Ok(())
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Left;

#[derive(Clone, Debug, Default, PartialEq)]
struct Right;

#[derive(Clone, Debug, Default, PartialEq)]
struct Both {
    left: Left,
    right: Right,
}

impl AsRef<Left> for Both {
    fn as_ref(&self) -> &Left {
        &self.left
    }
}

impl AsMut<Left> for Both {
    fn as_mut(&mut self) -> &mut Left {
        &mut self.left
    }
}

impl AsRef<Right> for Both {
    fn as_ref(&self) -> &Right {
        &self.right
    }
}

impl AsMut<Right> for Both {
    fn as_mut(&mut self) -> &mut Right {
        &mut self.right
    }
}

impl_reflect!(Left: Clone, PartialEq);
impl_reflect!(Right: Clone, PartialEq);
impl_reflect!(Both: Clone, PartialEq);

fn diamond(shadow: bool) -> Result<Registry, RegistrationError> {
    let mut registry = Registry::new();
    registry
        .reflect::<Left>(Id::from("left"))?
        .func_const(Id::from("f"), |_: &Left| "left")?;
    registry
        .reflect::<Right>(Id::from("right"))?
        .func_const(Id::from("f"), |_: &Right| "right")?
        .func_const(Id::from("g"), |_: &Right| "right")?;
    let both = registry
        .reflect::<Both>(Id::from("both"))?
        .base::<Left>()?
        .base::<Right>()?;
    if shadow {
        both.func_const(Id::from("f"), |_: &Both| "both")?;
    }
    Ok(registry)
}

#[test]
fn test_multiple_bases() -> Result<(), RegistrationError> {
    let registry = diamond(false)?;
    let ty = registry.resolve::<Both>();
    let value = registry.any(Both::default());

    assert_eq!(ty.bases().count(), 2);
    assert_eq!(ty.invoke(Id::from("f"), &value, ()).try_cast::<&'static str>(), Some(&"left"));
    assert_eq!(ty.invoke(Id::from("g"), &value, ()).try_cast::<&'static str>(), Some(&"right"));
    assert_eq!(ty.funcs().count(), 3);
    assert!(value.try_cast::<Right>().is_some());

    let registry = diamond(true)?;
    let ty = registry.resolve::<Both>();
    let value = registry.any(Both::default());
    assert_eq!(ty.invoke(Id::from("f"), &value, ()).try_cast::<&'static str>(), Some(&"both"));
    assert_eq!(ty.func(Id::from("f")).unwrap().parent(), ty);
    Ok(())
}

#[test]
fn test_functions_shadowed_by_signature() -> Result<(), RegistrationError> {
    let mut registry = hierarchy()?;
    registry
        .extend::<Child>()
        .func_const(Id::from("offset"), |c: &Child, by: f64| c.value as f64 + by)?;

    let ty = registry.resolve::<Child>();
    let value = registry.any(child(1));

    // The function of the derived type comes first.
    assert_eq!(
        ty.invoke(Id::from("offset"), &value, (0.5f64,)).try_cast::<f64>(),
        Some(&1.5)
    );
    assert!(ty.invoke(Id::from("offset"), &value, ("x",)).is_empty());

    // Nothing converts `i32` to `f64` in this registry, so the function of
    // the base is the first one accepting an `i32`.
    assert_eq!(
        ty.invoke(Id::from("offset"), &value, (2i32,)).try_cast::<i32>(),
        Some(&3)
    );
    Ok(())
}

#[test]
fn test_unregister_and_reregister() -> Result<(), RegistrationError> {
    let mut registry = hierarchy()?;
    registry.reflect::<Grid>(Id::from("grid"))?;
    assert_eq!(registry.len(), 3);

    assert!(registry.unregister::<Parent>());
    assert!(!registry.unregister::<Parent>());
    assert_eq!(registry.len(), 2);

    assert!(registry.resolve_id(Id::from("parent")).is_none());
    let parent = registry.resolve::<Parent>();
    assert!(!parent.is_registered());
    assert!(parent.data(Id::from("id")).is_none());
    assert!(parent.func(Id::from("offset")).is_none());
    assert!(parent.ctors().next().is_none());
    assert!(parent.prop("kind").is_none());

    // Members of the remaining types are untouched, but nothing is reached
    // through the removed base anymore.
    let child = registry.resolve::<Child>();
    assert!(child.is_registered());
    assert!(child.data(Id::from("value")).is_some());
    assert!(child.data(Id::from("id")).is_none());
    assert!(child.prop("kind").is_none());
    assert!(registry.resolve_id(Id::from("grid")).is_some());

    registry.reflect::<Parent>(Id::from("parent again"))?;
    assert!(registry.resolve_id(Id::from("parent")).is_none());
    assert_eq!(
        registry.resolve_id(Id::from("parent again")),
        Some(registry.resolve::<Parent>())
    );
    assert!(registry.resolve::<Parent>().data(Id::from("id")).is_none());

    let names: Vec<_> = registry.types().map(|ty| ty.id()).collect();
    assert_eq!(
        names,
        [
            Some(Id::from("child")),
            Some(Id::from("grid")),
            Some(Id::from("parent again")),
        ]
    );
    Ok(())
}

#[test]
fn test_registration_errors() -> Result<(), RegistrationError> {
    let mut registry = hierarchy()?;

    assert!(matches!(
        registry.reflect::<Child>(Id::from("other")),
        Err(RegistrationError::AlreadyRegistered { .. })
    ));
    assert!(matches!(
        registry.reflect::<Grid>(Id::from("child")),
        Err(RegistrationError::DuplicateTypeId { .. })
    ));
    assert!(matches!(
        registry.extend::<Child>().base::<Parent>(),
        Err(RegistrationError::DuplicateBase { .. })
    ));
    assert!(matches!(
        registry
            .extend::<Child>()
            .field_const(Id::from("tag"), |c: &Child| &c.value),
        Err(RegistrationError::DuplicateData { .. })
    ));
    assert!(matches!(
        registry
            .extend::<Child>()
            .func_static(Id::from("bump"), || 0u8),
        Err(RegistrationError::DuplicateFunc { .. })
    ));
    assert!(matches!(
        registry
            .extend::<Child>()
            .func_const(Id::from("sum"), |c: &Child| c.value)?
            .alias(),
        Err(RegistrationError::UnsupportedPolicy { .. })
    ));
    assert!(matches!(
        registry.extend::<Parent>().prop("kind", 0u8),
        Err(RegistrationError::DuplicateProp { .. })
    ));
    Ok(())
}

#[derive(Clone, Debug, PartialEq)]
struct Resource(u32);

impl_reflect!(Resource: Clone, PartialEq);

#[test]
fn test_destructor_hook() -> Result<(), RegistrationError> {
    let destroyed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&destroyed);

    let mut registry = Registry::new();
    registry
        .reflect::<Resource>(Id::from("resource"))?
        .dtor(move |_: &mut Resource| {
            counter.fetch_add(1, Ordering::SeqCst);
        })?;

    let value = registry.any(Resource(1));
    let copy = value.clone();
    drop(value);
    drop(copy);
    assert_eq!(destroyed.load(Ordering::SeqCst), 2);

    let mut resource = Resource(2);
    drop(Any::from_mut(&registry, &mut resource));
    assert_eq!(destroyed.load(Ordering::SeqCst), 2);

    let ty = registry.resolve::<Resource>();
    assert!(ty.dtor().is_some());
    assert!(ty.destroy(&mut resource));
    assert!(!ty.destroy(&resource));
    assert!(!ty.destroy(&mut Parent::default()));
    assert_eq!(destroyed.load(Ordering::SeqCst), 3);

    let taken = registry.any(Resource(3)).take::<Resource>();
    assert_eq!(taken, Ok(Resource(3)));
    assert_eq!(destroyed.load(Ordering::SeqCst), 3);
    Ok(())
}

static LEVEL: AtomicI32 = AtomicI32::new(3);
static SLOTS: [AtomicI32; 3] = [const { AtomicI32::new(0) }; 3];

struct Settings;

impl_reflect!(Settings);

#[test]
fn test_static_members() -> Result<(), RegistrationError> {
    let mut registry = Registry::new();
    registry
        .reflect::<Settings>(Id::from("settings"))?
        .static_data(
            Id::from("level"),
            || LEVEL.load(Ordering::SeqCst),
            |level: i32| LEVEL.store(level, Ordering::SeqCst),
        )?
        .static_array::<i32, 3, _, _>(
            Id::from("slots"),
            |index| SLOTS[index].load(Ordering::SeqCst),
            |index, slot| SLOTS[index].store(slot, Ordering::SeqCst),
        )?
        .func_static(Id::from("double"), |value: i32| value * 2)?;

    let ty = registry.resolve::<Settings>();
    let level = ty.data(Id::from("level")).unwrap();
    assert!(level.is_static());
    assert!(!level.is_const());
    assert_eq!(level.get(Handle::empty()).try_cast::<i32>(), Some(&3));

    assert!(level.set(Handle::empty(), 9i32));
    assert_eq!(LEVEL.load(Ordering::SeqCst), 9);
    assert!(!level.set(Handle::empty(), "nine"));
    assert_eq!(LEVEL.load(Ordering::SeqCst), 9);

    let slots = ty.data(Id::from("slots")).unwrap();
    assert!(slots.is_static());
    assert!(slots.ty().is_array());
    assert_eq!(slots.ty().extent(), 3);
    assert!(slots.set_at(Handle::empty(), 2, 5i32));
    assert_eq!(SLOTS[2].load(Ordering::SeqCst), 5);
    assert_eq!(slots.get_at(Handle::empty(), 2).try_cast::<i32>(), Some(&5));
    assert!(slots.get_at(Handle::empty(), 3).is_empty());
    assert!(!slots.set_at(Handle::empty(), 3, 1i32));
    assert!(slots.get(Handle::empty()).is_empty());
    assert!(!slots.set(Handle::empty(), 1i32));

    let double = ty.func(Id::from("double")).unwrap();
    assert!(double.is_static());
    assert_eq!(double.invoke(Handle::empty(), (21i32,)).try_cast::<i32>(), Some(&42));
    Ok(())
}

#[test]
fn test_equality_falls_back_to_identity() {
    let registry = Registry::new();

    let settings = registry.any(Settings);
    assert_eq!(settings, settings);
    assert_ne!(settings, registry.any(Settings));
    assert!(settings.clone().is_empty());

    assert_eq!(registry.any(String::from("a")), registry.any(String::from("a")));
    assert_ne!(registry.any(1u8), registry.any(1u16));
    assert_eq!(Any::empty(&registry), Any::empty(&registry));
}
