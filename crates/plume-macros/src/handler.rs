//! `#[on_message]` / `#[on_notice]` / `#[on_request]` implementation.
//!
//! The attribute leaves the function untouched and appends a
//! `linkme` static in `STATIC_HANDLERS` whose `install` function registers
//! the function under its name, guarded by `All` of the listed conditions.
//!
//! | Argument | Example | Description |
//! |----------|---------|-------------|
//! | `name` | `name = "echo"` | Registry key (default: the function name) |
//! | `crate` | `crate = ::plume` | Path the framework is reachable under (default: `::plume_framework`) |
//! | conditions | `cond::private(), cond::startswith("!")` | Guards, combined with logical AND |
//!
//! Options must come before the conditions.

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Expr, FnArg, Ident, ItemFn, LitStr, Path, Token};

// ============================================================================
// Category
// ============================================================================

#[derive(Clone, Copy)]
pub enum Category {
    Message,
    Notice,
    Request,
}

impl Category {
    fn event_type(self) -> Ident {
        match self {
            Self::Message => Ident::new("MessageEvent", Span::call_site()),
            Self::Notice => Ident::new("NoticeEvent", Span::call_site()),
            Self::Request => Ident::new("RequestEvent", Span::call_site()),
        }
    }

    fn variant(self) -> Ident {
        match self {
            Self::Message => Ident::new("Message", Span::call_site()),
            Self::Notice => Ident::new("Notice", Span::call_site()),
            Self::Request => Ident::new("Request", Span::call_site()),
        }
    }

    fn session(self) -> &'static str {
        match self {
            Self::Message => "MessageSession",
            Self::Notice => "NoticeSession",
            Self::Request => "RequestSession",
        }
    }
}

// ============================================================================
// Arguments
// ============================================================================

struct HandlerArgs {
    name: Option<LitStr>,
    krate: Option<Path>,
    conditions: Vec<Expr>,
}

impl Parse for HandlerArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut name = None;
        let mut krate = None;

        loop {
            if input.peek(Token![crate]) && input.peek2(Token![=]) {
                input.parse::<Token![crate]>()?;
                input.parse::<Token![=]>()?;
                krate = Some(input.call(Path::parse_mod_style)?);
            } else if is_name_option(input) {
                input.parse::<Ident>()?;
                input.parse::<Token![=]>()?;
                let lit: LitStr = input.parse()?;
                if lit.value().is_empty() {
                    return Err(syn::Error::new(lit.span(), "handler name must not be empty"));
                }
                name = Some(lit);
            } else {
                break;
            }

            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }

        let conditions = Punctuated::<Expr, Token![,]>::parse_terminated(input)?
            .into_iter()
            .collect();

        Ok(Self {
            name,
            krate,
            conditions,
        })
    }
}

fn is_name_option(input: ParseStream) -> bool {
    let fork = input.fork();
    matches!(fork.parse::<Ident>(), Ok(ident) if ident == "name")
        && fork.parse::<Token![=]>().is_ok()
        && fork.parse::<LitStr>().is_ok()
}

// ============================================================================
// Expansion
// ============================================================================

pub fn expand(category: Category, attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let args: HandlerArgs = syn::parse2(attr)?;
    let func: ItemFn = syn::parse2(item)?;
    validate(category, &func)?;

    let fn_name = &func.sig.ident;
    let name = args
        .name
        .unwrap_or_else(|| LitStr::new(&fn_name.unraw().to_string(), fn_name.span()));
    let krate = args
        .krate
        .unwrap_or_else(|| syn::parse_quote!(::plume_framework));
    let event = category.event_type();
    let variant = category.variant();
    let static_name = format_ident!("__PLUME_HANDLER_{}", fn_name.unraw().to_string().to_uppercase());

    let conditions = &args.conditions;
    let guard = if conditions.is_empty() {
        quote!()
    } else {
        quote! {
            .with_condition(#krate::Cond::<#krate::#event>::new(
                #krate::All::<#krate::#event>::new([
                    #( #krate::Cond::<#krate::#event>::new(#conditions) ),*
                ])
            ))
        }
    };

    Ok(quote! {
        #func

        #[#krate::linkme::distributed_slice(#krate::STATIC_HANDLERS)]
        #[linkme(crate = #krate::linkme)]
        #[doc(hidden)]
        static #static_name: #krate::StaticHandler = #krate::StaticHandler {
            name: #name,
            category: #krate::EventCategory::#variant,
            install: |registry: &mut #krate::Registry| {
                registry.register(
                    #name,
                    #krate::Handler::<#krate::#event>::new(#fn_name) #guard,
                );
            },
        };
    })
}

fn validate(category: Category, func: &ItemFn) -> syn::Result<()> {
    let sig = &func.sig;
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "handlers run synchronously; remove `async`",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "handlers cannot be generic",
        ));
    }
    if sig.inputs.len() != 1 || matches!(sig.inputs.first(), Some(FnArg::Receiver(_))) {
        return Err(syn::Error::new_spanned(
            &sig.inputs,
            format!(
                "expected a single parameter `session: &mut {}<'_>`",
                category.session()
            ),
        ));
    }
    Ok(())
}
