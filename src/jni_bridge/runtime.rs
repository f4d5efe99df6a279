// JniRuntime - the Java VM as a ManagedRuntime
//
// Handlers hold global references, so they stay valid on every thread. All
// other references are created inside a local frame per call, which the
// engine threads never pop on their own.

use jni::errors::Error as JniError;
use jni::objects::{GlobalRef, JClass, JMethodID, JObject};
use jni::signature::{Primitive, ReturnType};
use jni::sys::jvalue;
use jni::{JNIEnv, JavaVM};

use crate::error::BridgeError;
use crate::events::{ClientEvent, EventKind, FieldValue};
use crate::runtime::ManagedRuntime;

/// Local references needed by the largest event: the event object plus
/// three strings, with room to spare.
const LOCAL_FRAME_CAPACITY: i32 = 16;

impl From<JniError> for BridgeError {
    fn from(err: JniError) -> Self {
        BridgeError::Runtime {
            reason: err.to_string(),
        }
    }
}

/// Clear a pending Java exception, if any, after describing it to logcat.
pub(crate) fn clear_exception(env: &mut JNIEnv, err: &JniError) -> String {
    if matches!(env.exception_check(), Ok(true)) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
    err.to_string()
}

/// Event class, its constructor and the dispatch entry point.
pub struct JniHandler {
    /// Instance created at registration; keeps the class reachable
    target: GlobalRef,
    class: GlobalRef,
    constructor: JMethodID,
    dispatch: JMethodID,
}

impl JniHandler {
    pub fn target(&self) -> &JObject<'static> {
        self.target.as_obj()
    }
}

pub struct JniRuntime {
    vm: JavaVM,
}

impl JniRuntime {
    pub fn new(vm: JavaVM) -> Self {
        Self { vm }
    }

    pub fn vm(&self) -> &JavaVM {
        &self.vm
    }

    fn env(&self) -> Result<JNIEnv<'_>, BridgeError> {
        self.vm.get_env().map_err(|err| BridgeError::AttachFailed {
            reason: err.to_string(),
        })
    }
}

impl ManagedRuntime for JniRuntime {
    type Handler = JniHandler;

    fn is_current_thread_attached(&self) -> bool {
        self.vm.get_env().is_ok()
    }

    fn attach_current_thread(&self) -> Result<(), BridgeError> {
        self.vm
            .attach_current_thread_permanently()
            .map(|_| ())
            .map_err(|err| {
                tracing::error!("failed to attach current thread: {}", err);
                BridgeError::AttachFailed {
                    reason: err.to_string(),
                }
            })
    }

    fn detach_current_thread(&self) {
        // SAFETY: only called by AttachGuard on the thread it attached, after
        // every local reference of this call has been released with its frame.
        unsafe { self.vm.detach_current_thread() };
    }

    fn resolve_handler(
        &self,
        kind: EventKind,
        class_path: &str,
        dispatch_method: &str,
    ) -> Result<JniHandler, BridgeError> {
        let mut env = self.env()?;
        env.with_local_frame(LOCAL_FRAME_CAPACITY, |env| -> Result<JniHandler, BridgeError> {
            let fail = |env: &mut JNIEnv, what: &str, err: JniError| BridgeError::Runtime {
                reason: format!("{} {}: {}", what, class_path, clear_exception(env, &err)),
            };

            let class = env
                .find_class(class_path)
                .map_err(|err| fail(env, "failed to find class", err))?;
            let target = env
                .new_object(&class, "()V", &[])
                .map_err(|err| fail(env, "failed to create", err))?;
            let constructor = env
                .get_method_id(&class, "<init>", kind.constructor_signature())
                .map_err(|err| fail(env, "failed to get constructor of", err))?;
            let dispatch = env
                .get_method_id(&class, dispatch_method, "()V")
                .map_err(|err| fail(env, "failed to get dispatch method of", err))?;

            Ok(JniHandler {
                target: env.new_global_ref(&target)?,
                class: env.new_global_ref(&class)?,
                constructor,
                dispatch,
            })
        })
    }

    fn dispatch(&self, handler: &JniHandler, event: &ClientEvent) -> Result<(), BridgeError> {
        let kind = event.kind();
        let mut env = self.env()?;

        env.with_local_frame(LOCAL_FRAME_CAPACITY, |env| -> Result<(), BridgeError> {
            let mut args = Vec::with_capacity(kind.schema().len());
            for field in event.fields() {
                let arg = match field {
                    FieldValue::Long(value) => jvalue { j: value },
                    FieldValue::Int(value) => jvalue { i: value },
                    FieldValue::Str(value) => {
                        let string = env.new_string(value).map_err(|err| BridgeError::Marshal {
                            kind,
                            reason: clear_exception(env, &err),
                        })?;
                        // Released with the frame
                        jvalue {
                            l: JObject::from(string).into_raw(),
                        }
                    }
                };
                args.push(arg);
            }

            let class = <&JClass>::from(handler.class.as_obj());
            // SAFETY: the constructor id was resolved on this class with the
            // descriptor built from the same schema that produced `args`.
            let object = unsafe { env.new_object_unchecked(class, handler.constructor, &args) }
                .map_err(|err| BridgeError::Marshal {
                    kind,
                    reason: clear_exception(env, &err),
                })?;

            // SAFETY: the dispatch method was resolved on this class as `()V`.
            unsafe {
                env.call_method_unchecked(
                    &object,
                    handler.dispatch,
                    ReturnType::Primitive(Primitive::Void),
                    &[],
                )
            }
            .map_err(|err| BridgeError::HandlerFailed {
                kind,
                reason: clear_exception(env, &err),
            })?;
            Ok(())
        })
    }
}
