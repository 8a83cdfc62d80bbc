use darling::ast::NestedMeta;
use darling::{Error, FromMeta};
use proc_macro::TokenStream;
use quote::{format_ident, quote};

#[derive(Debug, FromMeta)]
struct CandidateMacroArgs {
    #[darling(default)]
    name: Option<String>,
}

/// Annotation for a summation candidate.
///
/// The annotated function must have the signature `fn(&[u32]) -> anyhow::Result<u64>`.
/// The function itself is kept as-is, and a `Candidate` constant named after the
/// function in upper case is generated next to it, with the same visibility.
///
/// The candidate label defaults to the function name and can be overridden with `name = "..."`.
///
/// # Example
///
/// ```rust
/// use sumbench::{candidate, Bencher, InputDataset};
///
/// #[candidate(name = "rev")]
/// fn sum_reversed(data: &[u32]) -> anyhow::Result<u64> {
///     Ok(data.iter().rev().map(|v| u64::from(*v)).sum())
/// }
///
/// let dataset = InputDataset::from_values(vec![1, 2, 3]);
/// let (sum, _) = Bencher::new().time_once(&SUM_REVERSED, &dataset).unwrap();
/// assert_eq!(SUM_REVERSED.name(), "rev");
/// assert_eq!(sum, 6);
/// ```
#[proc_macro_attribute]
pub fn candidate(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as syn::ItemFn);
    let attr_args = match NestedMeta::parse_meta_list(attr.into()) {
        Ok(v) => v,
        Err(e) => {
            return TokenStream::from(Error::from(e).write_errors());
        }
    };
    let args = match CandidateMacroArgs::from_list(&attr_args) {
        Ok(v) => v,
        Err(e) => {
            return TokenStream::from(e.write_errors());
        }
    };
    let func = &input.sig.ident;
    let vis = &input.vis;
    let label = args.name.unwrap_or_else(|| func.to_string());
    let constant = format_ident!("{}", func.to_string().to_uppercase());
    let result = quote! {
        #input

        #[doc = concat!("Candidate wrapping [`", stringify!(#func), "`].")]
        #vis const #constant: ::sumbench::Candidate = ::sumbench::Candidate::new(#label, #func);
    };
    result.into()
}
