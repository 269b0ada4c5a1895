//! Network references

use super::{parent, TypeBinding};
use crate::item::ItemType;
use crate::link::{LinkKind, ReferenceBag};
use crate::resource::mapper::{array_at, id_at, id_of, str_at, RecordView};
use serde_json::Value;

pub(super) static BINDINGS: &[TypeBinding] = &[
    TypeBinding {
        item_type: ItemType::NetworkVirtualNetwork,
        references: virtual_network,
    },
    TypeBinding {
        item_type: ItemType::NetworkSubnet,
        references: subnet,
    },
    TypeBinding {
        item_type: ItemType::NetworkVirtualNetworkPeering,
        references: virtual_network_peering,
    },
    TypeBinding {
        item_type: ItemType::NetworkNetworkInterface,
        references: network_interface,
    },
    TypeBinding {
        item_type: ItemType::NetworkPublicIpAddress,
        references: public_ip_address,
    },
    TypeBinding {
        item_type: ItemType::NetworkNetworkSecurityGroup,
        references: network_security_group,
    },
    TypeBinding {
        item_type: ItemType::NetworkRouteTable,
        references: route_table,
    },
    TypeBinding {
        item_type: ItemType::NetworkNatGateway,
        references: nat_gateway,
    },
    TypeBinding {
        item_type: ItemType::NetworkLoadBalancer,
        references: load_balancer,
    },
    TypeBinding {
        item_type: ItemType::NetworkLoadBalancerFrontendIpConfiguration,
        references: load_balancer_frontend,
    },
    TypeBinding {
        item_type: ItemType::NetworkLoadBalancerBackendAddressPool,
        references: load_balancer_backend_pool,
    },
    TypeBinding {
        item_type: ItemType::NetworkLoadBalancerProbe,
        references: load_balancer_probe,
    },
];

/// Registered types whose identifiers can own an IP configuration
const IP_CONFIGURATION_OWNERS: &[ItemType] = &[
    ItemType::NetworkNetworkInterface,
    ItemType::NetworkLoadBalancerFrontendIpConfiguration,
];

/// Plain string entries of an array (DNS server lists and the like)
fn string_entries<'a>(values: &'a [Value]) -> impl Iterator<Item = &'a str> + 'a {
    values.iter().filter_map(Value::as_str)
}

fn virtual_network(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    bag.children(ItemType::NetworkSubnet, view.parts)
        .children(ItemType::NetworkVirtualNetworkPeering, view.parts);

    for server in string_entries(view.array_at("properties.dhcpOptions.dnsServers")) {
        bag.ip(Some(server));
    }
}

fn subnet(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    parent(view, bag, ItemType::NetworkVirtualNetwork);

    bag.id(
        LinkKind::Dependency,
        ItemType::NetworkNetworkSecurityGroup,
        view.id_at("properties.networkSecurityGroup"),
    )
    .id(
        LinkKind::Dependency,
        ItemType::NetworkRouteTable,
        view.id_at("properties.routeTable"),
    )
    .id(
        LinkKind::Dependency,
        ItemType::NetworkNatGateway,
        view.id_at("properties.natGateway"),
    );

    // IP configurations belong to NICs and load balancer front ends alike
    for config in view.array_at("properties.ipConfigurations") {
        bag.owner(LinkKind::Dependent, IP_CONFIGURATION_OWNERS, id_of(config));
    }
}

fn virtual_network_peering(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    parent(view, bag, ItemType::NetworkVirtualNetwork);
    bag.id(
        LinkKind::Dependency,
        ItemType::NetworkVirtualNetwork,
        view.id_at("properties.remoteVirtualNetwork"),
    );
}

fn network_interface(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    bag.id(
        LinkKind::Dependent,
        ItemType::ComputeVirtualMachine,
        view.id_at("properties.virtualMachine"),
    )
    .id(
        LinkKind::Dependency,
        ItemType::NetworkNetworkSecurityGroup,
        view.id_at("properties.networkSecurityGroup"),
    );

    for config in view.array_at("properties.ipConfigurations") {
        bag.id(
            LinkKind::Dependency,
            ItemType::NetworkSubnet,
            id_at(config, "properties.subnet"),
        )
        .id(
            LinkKind::Dependency,
            ItemType::NetworkPublicIpAddress,
            id_at(config, "properties.publicIPAddress"),
        )
        .ip(str_at(config, "properties.privateIPAddress"));

        for pool in array_at(config, "properties.loadBalancerBackendAddressPools") {
            bag.id(
                LinkKind::Dependency,
                ItemType::NetworkLoadBalancerBackendAddressPool,
                id_of(pool),
            );
        }
    }

    for server in string_entries(view.array_at("properties.dnsSettings.dnsServers")) {
        bag.ip(Some(server));
    }
}

fn public_ip_address(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    bag.ip(view.str_at("properties.ipAddress"))
        .host(view.str_at("properties.dnsSettings.fqdn"))
        .owner(
            LinkKind::Dependent,
            IP_CONFIGURATION_OWNERS,
            view.id_at("properties.ipConfiguration"),
        )
        .id(
            LinkKind::Dependent,
            ItemType::NetworkNatGateway,
            view.id_at("properties.natGateway"),
        );
}

fn network_security_group(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    for subnet in view.array_at("properties.subnets") {
        bag.id(LinkKind::Dependent, ItemType::NetworkSubnet, id_of(subnet));
    }
    for nic in view.array_at("properties.networkInterfaces") {
        bag.id(LinkKind::Dependent, ItemType::NetworkNetworkInterface, id_of(nic));
    }
}

fn route_table(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    for subnet in view.array_at("properties.subnets") {
        bag.id(LinkKind::Dependent, ItemType::NetworkSubnet, id_of(subnet));
    }
    for route in view.array_at("properties.routes") {
        bag.ip(str_at(route, "properties.nextHopIpAddress"));
    }
}

fn nat_gateway(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    for ip in view.array_at("properties.publicIpAddresses") {
        bag.id(LinkKind::Dependency, ItemType::NetworkPublicIpAddress, id_of(ip));
    }
    for subnet in view.array_at("properties.subnets") {
        bag.id(LinkKind::Dependent, ItemType::NetworkSubnet, id_of(subnet));
    }
}

/// Front-end references shared by the load balancer and its front-end child
fn frontend_references(frontend: &Value, bag: &mut ReferenceBag) {
    bag.id(
        LinkKind::Dependency,
        ItemType::NetworkPublicIpAddress,
        id_at(frontend, "properties.publicIPAddress"),
    )
    .id(
        LinkKind::Dependency,
        ItemType::NetworkSubnet,
        id_at(frontend, "properties.subnet"),
    )
    .ip(str_at(frontend, "properties.privateIPAddress"));
}

fn load_balancer(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    let embedded = [
        (
            ItemType::NetworkLoadBalancerFrontendIpConfiguration,
            "properties.frontendIPConfigurations",
        ),
        (
            ItemType::NetworkLoadBalancerBackendAddressPool,
            "properties.backendAddressPools",
        ),
        (ItemType::NetworkLoadBalancerProbe, "properties.probes"),
    ];

    for (child_type, path) in embedded {
        bag.children(child_type, view.parts);
        for child in view.array_at(path) {
            bag.parts(LinkKind::OwnedChild, child_type, view.child_parts(child), None);
        }
    }

    for frontend in view.array_at("properties.frontendIPConfigurations") {
        frontend_references(frontend, bag);
    }
}

fn load_balancer_frontend(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    parent(view, bag, ItemType::NetworkLoadBalancer);
    frontend_references(view.record, bag);
}

fn load_balancer_backend_pool(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    parent(view, bag, ItemType::NetworkLoadBalancer);
    for config in view.array_at("properties.backendIPConfigurations") {
        bag.owner(
            LinkKind::Dependent,
            &[ItemType::NetworkNetworkInterface],
            id_of(config),
        );
    }
}

fn load_balancer_probe(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    parent(view, bag, ItemType::NetworkLoadBalancer);
}
