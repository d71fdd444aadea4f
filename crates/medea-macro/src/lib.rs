//! Internal macros and codegen for the `rtc-engine` media routing engine.
//!
//! This crate is intended for inner use only by the `rtc-engine` workspace.

#![deny(rustdoc::broken_intra_doc_links, rustdoc::private_intra_doc_links)]
#![forbid(non_ascii_idents, unsafe_code)]

mod dispatchable;

use proc_macro::TokenStream;

/// Generates a `*Handler` trait and a dispatching method for an event
/// represented as an `enum`.
///
/// # How to use
///
/// ### 1. Declare an `enum` for event variants and a `struct` to handle them.
/// ```
/// use rtc_engine_macro::dispatchable;
///
/// #[dispatchable]
/// enum Event {
///     Some { new_bar: i32 },
///     Another,
///     UnnamedVariant(i32, i32),
/// }
///
/// struct Foo {
///     bar: i32,
///     baz: i32,
/// }
/// ```
///
/// ### 2. Implement the handler for your `struct`.
///
/// For the given `enum` the macro generates a unique trait by adding
/// `Handler` to the end of its name. Each method of the trait is created by
/// `snake_case`-ing the `enum` variant name and adding an `on_` prefix.
///
/// ```
/// # use rtc_engine_macro::dispatchable;
/// #
/// # #[dispatchable]
/// # enum Event {
/// #     Some { new_bar: i32 },
/// #     Another,
/// #     UnnamedVariant(i32, i32),
/// # }
/// #
/// # struct Foo {
/// #     bar: i32,
/// #     baz: i32,
/// # }
/// #
/// impl EventHandler for Foo {
///     fn on_some(&mut self, new_bar: i32) {
///         self.bar = new_bar;
///     }
///
///     fn on_another(&mut self) {
///         self.bar = 2;
///     }
///
///     fn on_unnamed_variant(&mut self, data: (i32, i32)) {
///         self.bar = data.0;
///         self.baz = data.1;
///     }
/// }
/// ```
///
/// ### 3. Dispatch the event with the handler.
///
/// For the given `enum` the macro generates a `dispatch_with()` method that
/// dispatches the `enum` to the given handler.
///
/// ```
/// # use rtc_engine_macro::dispatchable;
/// #
/// # #[dispatchable]
/// # enum Event {
/// #     Some { new_bar: i32 },
/// #     Another,
/// #     UnnamedVariant(i32, i32),
/// # }
/// #
/// # struct Foo {
/// #     bar: i32,
/// #     baz: i32,
/// # }
/// #
/// # impl EventHandler for Foo {
/// #    fn on_some(&mut self, new_bar: i32) {
/// #        self.bar = new_bar;
/// #    }
/// #
/// #    fn on_another(&mut self) {
/// #        self.bar = 2;
/// #    }
/// #
/// #    fn on_unnamed_variant(&mut self, data: (i32, i32)) {
/// #        self.bar = data.0;
/// #        self.baz = data.1;
/// #    }
/// # }
/// #
/// let mut foo = Foo { bar: 0, baz: 0 };
///
/// Event::Some { new_bar: 1 }.dispatch_with(&mut foo);
/// assert_eq!(foo.bar, 1);
///
/// Event::Another.dispatch_with(&mut foo);
/// assert_eq!(foo.bar, 2);
///
/// Event::UnnamedVariant(3, 4).dispatch_with(&mut foo);
/// assert_eq!(foo.bar, 3);
/// assert_eq!(foo.baz, 4);
/// ```
#[proc_macro_attribute]
pub fn dispatchable(_args: TokenStream, input: TokenStream) -> TokenStream {
    dispatchable::derive(input)
        .unwrap_or_else(|e| e.to_compile_error().into())
}
