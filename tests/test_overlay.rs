use envflag::{ErrorHandling, Flag, FlagError, FlagSet, MapEnv};
use std::panic::{self, AssertUnwindSafe};

struct Flags {
    set: FlagSet,
    a: Flag<String>,
    b: Flag<i64>,
    c: Flag<bool>,
}

fn flags(error_handling: ErrorHandling) -> Flags {
    let mut set = FlagSet::new("", error_handling);
    let a = set.define("a", String::from("default"), "");
    let b = set.define("b", 123i64, "");
    let c = set.define("has-dashes", false, "");
    Flags { set, a, b, c }
}

#[test]
fn test_all_defaults() {
    let mut f = flags(ErrorHandling::ExitOnError);

    envflag::load_from("", &f.set, &MapEnv::new()).unwrap();
    f.set.parse(Vec::<String>::new()).unwrap();

    assert_eq!(f.a.get(), "default");
    assert_eq!(f.b.get(), 123);
    assert!(!f.c.get());
}

#[test]
fn test_override_partially_via_env() {
    let mut f = flags(ErrorHandling::ExitOnError);
    let env = MapEnv::new().with("A", "from-env").with("HAS_DASHES", "true");

    envflag::load_from("", &f.set, &env).unwrap();
    f.set.parse(Vec::<String>::new()).unwrap();

    assert_eq!(f.a.get(), "from-env");
    assert_eq!(f.b.get(), 123);
    assert!(f.c.get());
}

#[test]
fn test_argv_overrides_env() {
    let mut f = flags(ErrorHandling::ExitOnError);
    let env = MapEnv::new().with("A", "from-env").with("HAS_DASHES", "true");

    envflag::load_from("", &f.set, &env).unwrap();
    f.set.parse(["--a=from-argv"]).unwrap();

    assert_eq!(f.a.get(), "from-argv");
    assert_eq!(f.b.get(), 123);
    assert!(f.c.get());
}

#[test]
fn test_prefixed_env_then_argv() {
    let mut f = flags(ErrorHandling::ExitOnError);
    let env = MapEnv::new()
        .with("SOME_PREFIX_A", "from-env")
        .with("SOME_PREFIX_HAS_DASHES", "true");

    envflag::load_from("some-prefix", &f.set, &env).unwrap();
    f.set.parse(["--a=from-argv"]).unwrap();

    assert_eq!(f.a.get(), "from-argv");
    assert_eq!(f.b.get(), 123);
    assert!(f.c.get());
}

#[test]
fn test_prefixed_env_without_argv() {
    let f = flags(ErrorHandling::ExitOnError);
    let env = MapEnv::new().with("SOME_PREFIX_A", "from-env");

    envflag::load_from("some-prefix", &f.set, &env).unwrap();

    assert_eq!(f.a.get(), "from-env");
}

#[test]
fn test_empty_env_value_counts_as_set() {
    let f = flags(ErrorHandling::ExitOnError);

    envflag::load_from("cmd", &f.set, &MapEnv::new().with("CMD_A", "")).unwrap();

    assert_eq!(f.a.get(), "");
    assert_eq!(f.b.get(), 123);
}

#[test]
fn test_panic_on_error() {
    let mut set = FlagSet::new("", ErrorHandling::PanicOnError);
    set.define("b", 123i64, "");
    let env = MapEnv::new().with("B", "not-an-int");

    let result = panic::catch_unwind(AssertUnwindSafe(|| envflag::load_from("", &set, &env)));

    assert!(result.is_err());
}

#[test]
fn test_continue_on_error() {
    let mut set = FlagSet::new("", ErrorHandling::ContinueOnError);
    let b = set.define("b", 123i64, "");
    let env = MapEnv::new().with("B", "not-an-int");

    let err = envflag::load_from("", &set, &env).unwrap_err();

    assert!(matches!(err, FlagError::InvalidEnv { ref key, .. } if key == "B"));
    assert_eq!(b.get(), 123);
}

#[test]
fn test_apply_ignores_policy() {
    let mut set = FlagSet::new("", ErrorHandling::PanicOnError);
    set.define("b", 123i64, "");

    let result = envflag::apply("", &set, &MapEnv::new().with("B", "not-an-int"));

    assert!(result.is_err());
}

#[test]
fn test_custom_value() {
    use envflag::Value;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Tags(Arc<Mutex<Vec<String>>>);

    impl Value for Tags {
        fn set(&self, raw: &str) -> Result<(), String> {
            let mut tags = self.0.lock().unwrap();
            *tags = raw.split(',').map(str::to_string).collect();
            Ok(())
        }

        fn current(&self) -> String {
            self.0.lock().unwrap().join(",")
        }
    }

    let tags = Tags::default();
    let mut set = FlagSet::new("", ErrorHandling::ContinueOnError);
    set.var("tags", "comma separated tags", Box::new(tags.clone()));

    envflag::load_from("svc", &set, &MapEnv::new().with("SVC_TAGS", "a,b")).unwrap();

    assert_eq!(*tags.0.lock().unwrap(), ["a", "b"]);
    assert_eq!(set.lookup("tags").unwrap().value().current(), "a,b");
}
