//! Fixed XML templates for generated proxy bundles.
//!
//! Placeholders of the form `{name}` are interpolated by
//! [`crate::bundle::render`]; everything else is emitted verbatim.

pub const PROXY_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<APIProxy revision="1" name="{app_name}">
    <ConfigurationVersion majorVersion="4" minorVersion="0"/>
    <CreatedBy>drydock@drydock.io</CreatedBy>
    <Description>This is a proxy for {app_name} deployed on Drydock.</Description>
    <DisplayName>{app_name}</DisplayName>
    <LastModifiedBy>drydock@drydock.io</LastModifiedBy>
    <Policies>
        <Policy>AddCors</Policy>
        <Policy>RetainHostHeader</Policy>
        <Policy>SetRoutingAPIKey</Policy>
    </Policies>
    <ProxyEndpoints>
        <ProxyEndpoint>default</ProxyEndpoint>
    </ProxyEndpoints>
    <Resources/>
    <TargetServers/>
    <TargetEndpoints>
        <TargetEndpoint>default</TargetEndpoint>
    </TargetEndpoints>
    <validate>false</validate>
</APIProxy>
"#;

pub const PROXY_ENDPOINT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<ProxyEndpoint name="default">
    <Description/>
    <FaultRules/>
    <PreFlow name="PreFlow">
        <Request/>
        <Response/>
    </PreFlow>
    <PostFlow name="PostFlow">
        <Request/>
        <Response/>
    </PostFlow>
    <Flows/>
    <HTTPProxyConnection>
        <BasePath>{base_path}</BasePath>
        <Properties/>
        <VirtualHost>default</VirtualHost>
        <VirtualHost>secure</VirtualHost>
    </HTTPProxyConnection>
    <RouteRule name="default">
        <TargetEndpoint>default</TargetEndpoint>
    </RouteRule>
</ProxyEndpoint>
"#;

pub const TARGET_ENDPOINT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<TargetEndpoint name="default">
    <Description/>
    <FaultRules/>
    <PreFlow name="PreFlow">
        <Request>
            <Step>
                <Name>RetainHostHeader</Name>
            </Step>
            <Step>
                <Name>SetRoutingAPIKey</Name>
            </Step>
        </Request>
        <Response>
            <Step>
                <Name>AddCors</Name>
            </Step>
        </Response>
    </PreFlow>
    <PostFlow name="PostFlow">
        <Request/>
        <Response/>
    </PostFlow>
    <Flows/>
    <HTTPTargetConnection>
        <Properties/>
        <URL>https://ingress.drydock.io</URL>
    </HTTPTargetConnection>
</TargetEndpoint>
"#;

pub const ADD_CORS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<AssignMessage async="false" continueOnError="false" enabled="true" name="AddCors">
    <DisplayName>Add CORS Headers</DisplayName>
    <FaultRules/>
    <Properties/>
    <Add>
        <Headers>
            <Header name="Access-Control-Allow-Origin">*</Header>
            <Header name="Access-Control-Allow-Headers">origin, x-requested-with, accept</Header>
            <Header name="Access-Control-Max-Age">3628800</Header>
            <Header name="Access-Control-Allow-Methods">GET, PUT, POST, DELETE</Header>
        </Headers>
    </Add>
    <IgnoreUnresolvedVariables>true</IgnoreUnresolvedVariables>
    <AssignTo createNew="false" transport="http" type="response"/>
</AssignMessage>
"#;

pub const RETAIN_HOST: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<AssignMessage async="false" continueOnError="false" enabled="true" name="RetainHostHeader">
    <DisplayName>Retain Host Header for Target</DisplayName>
    <Properties/>
    <AssignVariable>
        <Name>target.header.host</Name>
        <Value>{target_host}</Value>
        <Ref/>
    </AssignVariable>
    <IgnoreUnresolvedVariables>true</IgnoreUnresolvedVariables>
    <AssignTo createNew="false" transport="http" type="request"/>
</AssignMessage>
"#;

pub const ROUTING_KEY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<AssignMessage async="false" continueOnError="false" enabled="true" name="SetRoutingAPIKey">
    <DisplayName>Set Routing API Key</DisplayName>
    <Properties/>
    <Set>
        <Headers>
            <Header name="X-ROUTING-API-KEY">{routing_key}</Header>
        </Headers>
    </Set>
    <IgnoreUnresolvedVariables>true</IgnoreUnresolvedVariables>
    <AssignTo createNew="false" transport="http" type="request"/>
</AssignMessage>
"#;
