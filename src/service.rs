// ==============================================================================
// Service and RPC Translation
// ==============================================================================
//
// Twirp serves every RPC as `POST /<prefix>/<package>.<Service>/<Method>` with
// the request message as the JSON body. Each service contributes one tag; each
// RPC contributes one path with a single POST operation.

use std::collections::BTreeMap;

use crate::context::TranslationContext;
use crate::doc_comments::description;
use crate::error::{Result, TranslateError};
use crate::model::proto::{Rpc, Service};
use crate::model::swagger::{Operation, Parameter, PathItem, Response, Schema};
use crate::types;

/// Route of `rpc` on `service`: `/<base>/<package>.<Service>/<Rpc>`, where
/// `base` is the lower-cased service name with every `service` removed.
///
/// ```
/// use twirp_swagger::service::route_for;
/// assert_eq!(
///     route_for("OrderService", "orders", "GetOrder"),
///     "/order/orders.OrderService/GetOrder"
/// );
/// ```
pub fn route_for(service: &str, package: &str, rpc: &str) -> String {
    let base = service.to_lowercase().replace("service", "");
    format!("/{base}/{package}.{service}/{rpc}")
}

/// Register the service's tag. Seeing the same service name again is a no-op.
pub fn define_service(service: &Service, ctx: &mut TranslationContext) {
    ctx.add_tag(&service.name, description(service.comment.as_ref()));
}

/// Add the path for `rpc`. `parent` is the service the RPC was declared in;
/// an RPC outside a service is rejected.
pub fn define_rpc(rpc: &Rpc, parent: Option<&Service>, ctx: &mut TranslationContext) -> Result<()> {
    let Some(service) = parent else {
        return Err(TranslateError::Structural(format!(
            "rpc `{}` is not declared inside a service",
            rpc.name
        )));
    };

    let package = &ctx.current_package;
    let request = types::qualify(&rpc.request_type, package);
    let response = types::qualify(&rpc.returns_type, package);
    let route = route_for(&service.name, package, &rpc.name);

    let operation = Operation {
        tags: vec![service.name.clone()],
        summary: description(rpc.comment.as_ref()),
        operation_id: rpc.name.clone(),
        parameters: vec![Parameter {
            name: "body".to_string(),
            location: "body".to_string(),
            required: true,
            schema: Schema::reference(&request),
        }],
        responses: BTreeMap::from([(
            "200".to_string(),
            Response {
                description: "A successful response.".to_string(),
                schema: Schema::reference(&response),
            },
        )]),
    };

    ctx.paths.insert(route, PathItem { post: operation });
    Ok(())
}
