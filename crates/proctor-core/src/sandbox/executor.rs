//! Local executor backed by a fresh Rhai engine per evaluation

use parking_lot::Mutex;
use rhai::module_resolvers::DummyModuleResolver;
use rhai::{AST, CallFnOptions, Dynamic, Engine, EvalAltResult, FnPtr, Scope};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use super::SandboxLimits;
use crate::capture::DiagnosticChannel;
use crate::grader::EntryPointHandle;

/// How often (in operations) the wall clock is consulted
const CLOCK_CHECK_INTERVAL: u64 = 1024;

/// Result of loading submitted source
pub enum LoadOutcome {
    /// Source loaded and the entry point can be invoked
    Ready(EntryPoint),
    /// Source loaded but does not define a callable entry point
    EntryPointMissing,
    /// Source failed to compile or faulted while running top-level code
    Fault(String),
}

impl std::fmt::Debug for LoadOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadOutcome::Ready(entry) => write!(f, "Ready({})", entry.name),
            LoadOutcome::EntryPointMissing => write!(f, "EntryPointMissing"),
            LoadOutcome::Fault(message) => write!(f, "Fault({:?})", message),
        }
    }
}

/// Deadline shared between an engine's progress hook and its owner
#[derive(Clone, Default)]
struct Deadline(Arc<Mutex<Option<Instant>>>);

impl Deadline {
    fn arm(&self, limits: &SandboxLimits) {
        *self.0.lock() = Some(Instant::now() + limits.time_limit);
    }

    fn disarm(&self) {
        *self.0.lock() = None;
    }

    fn expired(&self) -> bool {
        matches!(*self.0.lock(), Some(deadline) if Instant::now() >= deadline)
    }
}

/// Evaluates submitted Rhai source in an isolated interpreter
///
/// Every call to [`LocalExecutor::load`] builds a brand-new engine and scope.
/// The engine has no module loading, no `eval`, and no host functions beyond
/// Rhai's standard packages, so submitted code cannot reach the filesystem
/// or network. `print` and `debug` are routed into the diagnostic channel.
#[derive(Debug, Clone, Default)]
pub struct LocalExecutor {
    limits: SandboxLimits,
}

impl LocalExecutor {
    pub fn new(limits: SandboxLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &SandboxLimits {
        &self.limits
    }

    /// Compile and run `source`, then look up `entry_point`
    ///
    /// The entry point is either a script `fn` definition or a top-level
    /// variable holding a function pointer (`let twoSum = |nums, target| ...`).
    /// Definitions win over variables. When `arity` is given, only a callable
    /// taking exactly that many (uncurried) parameters counts.
    pub fn load(
        &self,
        source: &str,
        entry_point: &str,
        arity: Option<usize>,
        channel: &DiagnosticChannel,
    ) -> LoadOutcome {
        let deadline = Deadline::default();
        let engine = self.build_engine(channel, &deadline);

        let ast = match engine.compile(source) {
            Ok(ast) => ast,
            Err(err) => return LoadOutcome::Fault(format!("Syntax error: {}", err)),
        };

        let mut scope = Scope::new();
        deadline.arm(&self.limits);
        let loaded = engine.run_ast_with_scope(&mut scope, &ast);
        deadline.disarm();

        if let Err(err) = loaded {
            return LoadOutcome::Fault(describe_fault(&err, &self.limits));
        }

        let Some(target) = resolve_target(&ast, &scope, entry_point, arity) else {
            tracing::debug!(entry_point, "entry point not defined by submission");
            return LoadOutcome::EntryPointMissing;
        };

        LoadOutcome::Ready(EntryPoint {
            engine,
            ast,
            scope,
            name: entry_point.to_string(),
            target,
            deadline,
            limits: self.limits.clone(),
        })
    }

    fn build_engine(&self, channel: &DiagnosticChannel, deadline: &Deadline) -> Engine {
        let mut engine = Engine::new();
        self.limits.apply(&mut engine);
        engine.set_module_resolver(DummyModuleResolver::new());
        engine.disable_symbol("eval");

        let out = channel.clone();
        engine.on_print(move |text| out.emit(text));

        let out = channel.clone();
        engine.on_debug(move |text, _source, _pos| out.emit(&format!("[debug] {}", text)));

        let clock = deadline.clone();
        engine.on_progress(move |ops| {
            if ops % CLOCK_CHECK_INTERVAL == 0 && clock.expired() {
                Some(Dynamic::from("time limit"))
            } else {
                None
            }
        });

        engine
    }
}

/// How an entry point is reached inside the interpreter
enum EntryTarget {
    /// A script `fn` definition, called by name
    Script,
    /// A function pointer bound to a top-level variable
    Pointer(FnPtr),
}

fn resolve_target(
    ast: &AST,
    scope: &Scope<'_>,
    entry_point: &str,
    arity: Option<usize>,
) -> Option<EntryTarget> {
    let defined = ast
        .iter_functions()
        .any(|f| f.name == entry_point && arity.is_none_or(|n| f.params.len() == n));
    if defined {
        return Some(EntryTarget::Script);
    }

    let pointer = scope.get_value::<FnPtr>(entry_point)?;
    let Some(n) = arity else {
        return Some(EntryTarget::Pointer(pointer));
    };

    // Captured variables are curried into leading parameters of the hoisted
    // function, so they do not count toward the caller-facing arity.
    let curried = pointer.curry().len();
    let target = ast.iter_functions().find(|f| f.name == pointer.fn_name());
    match target {
        Some(f) if f.params.len().checked_sub(curried) != Some(n) => None,
        // Pointers to non-script functions have no metadata to check
        _ => Some(EntryTarget::Pointer(pointer)),
    }
}

/// Invocable entry point inside a loaded interpreter
///
/// Holds the engine, compiled program and top-level scope for the lifetime
/// of one evaluation. Dropping it tears the interpreter down.
pub struct EntryPoint {
    engine: Engine,
    ast: AST,
    scope: Scope<'static>,
    name: String,
    target: EntryTarget,
    deadline: Deadline,
    limits: SandboxLimits,
}

impl EntryPointHandle for EntryPoint {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, args: Vec<Value>) -> Result<Value, String> {
        let args = args
            .iter()
            .map(rhai::serde::to_dynamic)
            .collect::<Result<Vec<Dynamic>, _>>()
            .map_err(|e| format!("Could not pass input to {}: {}", self.name, e))?;

        self.deadline.arm(&self.limits);
        let result = match &self.target {
            EntryTarget::Script => {
                let options = CallFnOptions::new().eval_ast(false).rewind_scope(true);
                self.engine.call_fn_with_options::<Dynamic>(
                    options,
                    &mut self.scope,
                    &self.ast,
                    &self.name,
                    args,
                )
            }
            EntryTarget::Pointer(pointer) => pointer
                .call::<Dynamic>(&self.engine, &self.ast, args)
                .map_err(|err| match *err {
                    // Report the thrown error itself, as named calls do
                    EvalAltResult::ErrorInFunctionCall(name, _, inner, _)
                        if name == pointer.fn_name() =>
                    {
                        inner
                    }
                    other => other.into(),
                }),
        };
        self.deadline.disarm();

        let value = result.map_err(|err| describe_fault(&err, &self.limits))?;
        rhai::serde::from_dynamic::<Value>(&value)
            .map_err(|e| format!("Returned a value that cannot be compared: {}", e))
    }
}

fn describe_fault(err: &EvalAltResult, limits: &SandboxLimits) -> String {
    match err {
        EvalAltResult::ErrorTerminated(..) => format!(
            "Time limit of {}ms exceeded",
            limits.time_limit.as_millis()
        ),
        EvalAltResult::ErrorTooManyOperations(..) => {
            format!("Operation limit of {} exceeded", limits.max_operations)
        }
        other => other.to_string(),
    }
}
